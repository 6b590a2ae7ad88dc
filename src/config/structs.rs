use serde::{Deserialize, Serialize};

/// 应用配置结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub gradebook: GradebookConfig,
    pub import: ImportConfig,
    pub export: ExportConfig,
}

/// 应用设置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub system_name: String,
    pub environment: String,
    pub log_level: String,
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub unix_socket_path: String,
    pub workers: usize,
    pub max_workers: usize,
    pub timeouts: TimeoutConfig,
    pub limits: LimitConfig,
}

/// 超时配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutConfig {
    pub client_request: u64,
    pub client_disconnect: u64,
    pub keep_alive: u64,
}

/// 限制配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitConfig {
    pub max_payload_size: usize,
}

/// CORS 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allowed_methods: Vec<String>,
    pub allowed_headers: Vec<String>,
    pub max_age: usize,
}

/// 成绩册数据源配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradebookConfig {
    #[serde(rename = "type")]
    pub storage_type: String, // 存储后端名称
    pub data_path: String,    // 成绩册快照文件路径（JSON）
}

/// 成绩导入配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportConfig {
    pub csv_mime_types: Vec<String>,         // 识别为 CSV 的 MIME 类型
    pub spreadsheet_mime_types: Vec<String>, // 识别为 Excel 工作簿的 MIME 类型
    pub max_upload_size: usize,              // 上传文件最大字节数
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            csv_mime_types: vec!["text/csv".to_string()],
            spreadsheet_mime_types: vec![
                "application/vnd.ms-excel".to_string(),
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet".to_string(),
            ],
            max_upload_size: 2 * 1024 * 1024,
        }
    }
}

/// 模板导出配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    pub temp_dir: String,    // 临时文件目录，留空使用系统临时目录
    pub file_prefix: String, // 临时文件名前缀
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            temp_dir: String::new(),
            file_prefix: "gradebookTemplate".to_string(),
        }
    }
}
