// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// - 领域模型（models）：论文、窗口、分析结果、运行状态
/// - 论文源接口（feed）
/// - 仓库接口（repositories）：运行产物的持久化抽象
/// - 服务（services）：收集、排序、分析与报告
///
/// 领域层不依赖于任何外部实现。
pub mod feed;
pub mod models;
pub mod repositories;
pub mod services;
