//! Gradebook Import - 成绩表导入与对比服务
//!
//! 基于 Actix Web 构建，负责导出成绩模板、解析上传的成绩表并与成绩册对比。
//!
//! # 架构
//! - `config`: 配置管理
//! - `errors`: 统一错误处理
//! - `importer`: 导入核心（格式识别、解析、学号映射、成绩对比、模板导出）
//! - `models`: 数据模型定义
//! - `routes`: API 路由层
//! - `runtime`: 运行时生命周期管理
//! - `services`: 业务逻辑层
//! - `storage`: 成绩册存储层
//! - `utils`: 工具函数

pub mod config;
pub mod errors;
pub mod importer;
pub mod models;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;
