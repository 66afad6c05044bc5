use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::document::DocumentType;

/// 二维码容错级别
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCorrection {
    L,
    #[default]
    M,
    Q,
    H,
}

impl From<ErrorCorrection> for qrcode::EcLevel {
    fn from(level: ErrorCorrection) -> Self {
        match level {
            ErrorCorrection::L => qrcode::EcLevel::L,
            ErrorCorrection::M => qrcode::EcLevel::M,
            ErrorCorrection::Q => qrcode::EcLevel::Q,
            ErrorCorrection::H => qrcode::EcLevel::H,
        }
    }
}

/// 二维码颜色
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QrColors {
    pub dark: Option<String>,
    pub light: Option<String>,
}

/// 二维码在页面中的位置描述
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QrPosition {
    /// 定位用的 CSS 类名
    pub class: Option<String>,
    /// 图片的 alt 文本
    pub title: Option<String>,
}

impl QrPosition {
    pub fn class_name(&self) -> &str {
        self.class.as_deref().unwrap_or("qr-code-top-right")
    }

    pub fn title_text(&self) -> &str {
        self.title.as_deref().unwrap_or("Scan to view online")
    }
}

/// 二维码参数（可按文档类型覆盖的部分）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrOptions {
    pub base_url: Option<String>,
    pub width: Option<u32>,
    pub margin: Option<u32>,
    pub error_correction_level: Option<ErrorCorrection>,
    #[serde(alias = "color")]
    pub colors: Option<QrColors>,
    pub position: Option<QrPosition>,
}

impl QrOptions {
    /// 浅合并，规则同 `PageConfig::merge`
    pub fn merge(&self, overrides: &QrOptions) -> QrOptions {
        QrOptions {
            base_url: overrides.base_url.clone().or_else(|| self.base_url.clone()),
            width: overrides.width.or(self.width),
            margin: overrides.margin.or(self.margin),
            error_correction_level: overrides
                .error_correction_level
                .or(self.error_correction_level),
            colors: overrides.colors.clone().or_else(|| self.colors.clone()),
            position: overrides.position.clone().or_else(|| self.position.clone()),
        }
    }

    /// 图片像素宽度
    pub fn width_px(&self) -> u32 {
        self.width.unwrap_or(65)
    }

    /// 静区宽度（模块数）
    pub fn margin_modules(&self) -> u32 {
        self.margin.unwrap_or(1)
    }

    pub fn ec_level(&self) -> ErrorCorrection {
        self.error_correction_level.unwrap_or_default()
    }

    pub fn dark_color(&self) -> &str {
        self.colors
            .as_ref()
            .and_then(|c| c.dark.as_deref())
            .unwrap_or("#003355")
    }

    pub fn light_color(&self) -> &str {
        self.colors
            .as_ref()
            .and_then(|c| c.light.as_deref())
            .unwrap_or("#ffffff")
    }
}

/// 配置文件中的 `qrCode` 节
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(flatten)]
    pub options: QrOptions,
    /// 按文档类型覆盖
    #[serde(default)]
    pub documents: HashMap<String, QrOptions>,
}

impl QrConfig {
    /// 某类文档实际使用的二维码参数
    pub fn resolve(&self, doc_type: DocumentType) -> QrOptions {
        match self.documents.get(doc_type.as_str()) {
            Some(overrides) => self.options.merge(overrides),
            None => self.options.clone(),
        }
    }
}
