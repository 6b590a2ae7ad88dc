use serde::Deserialize;

use crate::importer::TemplateFormat;

// 模板下载查询参数
#[derive(Debug, Deserialize)]
pub struct TemplateDownloadParams {
    #[serde(default = "default_include_grades")]
    pub include_grades: bool,
    #[serde(default)]
    pub format: TemplateFormat,
}

fn default_include_grades() -> bool {
    true
}
