// 该文件是 Huiying（绘影）项目的一部分。
// src/response.rs - 统一响应记录
//
// 本文件根据 Apache 许可证第 2.0 版（以下简称“许可证”）授权使用；
// 除非遵守该许可证条款，否则您不得使用本文件。
// 您可通过以下网址获取许可证副本：
// http://www.apache.org/licenses/LICENSE-2.0
// 除非适用法律要求或书面同意，根据本许可协议分发的软件均按“原样”提供，
// 不附带任何形式的明示或暗示的保证或条件。
// 有关许可权限与限制的具体条款，请参阅本许可协议。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, Wareless Group

use serde::Serialize;

use crate::preset::Preset;

/// 请求门面的唯一返回类型
///
/// 无论成功、取消还是降级，外层聊天服务收到的响应形状一致；
/// `fallback` 标志让客户端区分真实结果与模拟结果。
#[derive(Debug, Clone, Serialize)]
pub struct ResponseRecord {
  /// 是否成功
  pub success: bool,
  /// 预设标识符
  pub style: String,
  /// 面向用户的风格名称
  pub style_name: String,
  /// 风格描述
  pub description: String,
  /// 面向用户的状态消息
  pub message: String,
  /// 静态目录下的图像 URL
  pub image_url: String,
  /// 内联传输用的 Base64 JPEG（硬失败时可缺省）
  #[serde(skip_serializing_if = "Option::is_none")]
  pub image_data: Option<String>,
  /// 是否为降级（模拟）结果
  pub fallback: bool,
  /// 错误原因（仅失败时）
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error: Option<String>,
}

impl ResponseRecord {
  /// 以预设元数据初始化一条空白记录
  pub fn for_preset(preset: Preset) -> Self {
    Self {
      success: false,
      style: preset.identifier().to_string(),
      style_name: preset.display_name().to_string(),
      description: preset.description().to_string(),
      message: String::new(),
      image_url: String::new(),
      image_data: None,
      fallback: false,
      error: None,
    }
  }

  /// 未知预设的错误响应，消息中枚举可接受的取值
  pub fn invalid_preset(requested: &str) -> Self {
    let accepted = Preset::ALL.map(|p| p.identifier()).join(", ");
    Self {
      success: false,
      style: requested.to_string(),
      style_name: String::new(),
      description: String::new(),
      message: format!(
        "Unknown style '{}'. Accepted styles: {}",
        requested, accepted
      ),
      image_url: String::new(),
      image_data: None,
      fallback: false,
      error: Some("invalid preset".to_string()),
    }
  }

  /// 用户取消的响应
  pub fn cancelled(preset: Preset) -> Self {
    let mut record = Self::for_preset(preset);
    record.message = "cancelled".to_string();
    record
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn invalid_preset_enumerates_accepted_values() {
    let record = ResponseRecord::invalid_preset("Miyazaki");
    assert!(!record.success);
    for p in Preset::ALL {
      assert!(record.message.contains(p.identifier()));
    }
  }

  #[test]
  fn serialization_omits_absent_image_data() {
    let record = ResponseRecord::cancelled(Preset::Hayao);
    let json = serde_json::to_string(&record).unwrap();
    assert!(!json.contains("image_data"));
    assert!(json.contains("\"fallback\":false"));
  }
}
