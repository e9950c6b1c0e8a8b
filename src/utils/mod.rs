//! # 常用接口模块
//!
//! 本模块提供一些常用的辅助工具（目前主要是单元测试用的断言宏）
