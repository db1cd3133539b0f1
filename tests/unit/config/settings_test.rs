// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

#[cfg(test)]
mod tests {
    use arxiv_daily::config::settings::{AnalysisProvider, Settings};

    #[test]
    fn test_environment_overrides() {
        std::env::set_var("ARXIV_DAILY__FEED__CATEGORY", "cs.CL");
        std::env::set_var("ARXIV_DAILY__ANALYSIS__PROVIDER", "llm");
        std::env::set_var("ARXIV_DAILY__EMAIL__TO", "a@example.org,b@example.org");
        std::env::set_var("ARXIV_DAILY__RANKING__TOP_N", "5");

        let settings = Settings::new();

        std::env::remove_var("ARXIV_DAILY__FEED__CATEGORY");
        std::env::remove_var("ARXIV_DAILY__ANALYSIS__PROVIDER");
        std::env::remove_var("ARXIV_DAILY__EMAIL__TO");
        std::env::remove_var("ARXIV_DAILY__RANKING__TOP_N");

        let settings = settings.expect("settings should load");
        assert_eq!(settings.feed.category, "cs.CL");
        assert_eq!(settings.analysis.provider, AnalysisProvider::Llm);
        assert_eq!(settings.email.to, vec!["a@example.org", "b@example.org"]);
        assert_eq!(settings.ranking.top_n, 5);
        // untouched values keep their defaults
        assert_eq!(settings.feed.max_results, 200);
    }
}
