// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

#[cfg(test)]
mod tests {
    use arxiv_daily::utils::telemetry;

    #[test]
    fn test_telemetry_initialization_is_idempotent() {
        telemetry::init_telemetry();
        // 第二次初始化不应 panic
        telemetry::init_telemetry();

        tracing::info!(target_date = "2025-01-15", collected = 12, "Collection finished");
        tracing::error!(stage = "collecting", "Daily run failed");
    }
}
