// 该文件是 Huiying（绘影）项目的一部分。
// src/fallback.rs - 降级响应器（摄像头不可用时的模拟结果）
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

use chrono::Local;
use rand::Rng;
use tracing::info;

use crate::emotion::{Emotion, EmotionReading};
use crate::package::STATIC_URL_PREFIX;
use crate::preset::Preset;
use crate::response::ResponseRecord;

/// 降级响应器
///
/// 当帧来源或风格化失败时合成一条结构上完全有效的响应，
/// 让外层聊天服务总能向用户展示一些有用的东西。
pub struct FallbackResponder;

impl FallbackResponder {
  /// 合成一条模拟的风格化响应
  ///
  /// 无需写出任何像素：仅给出合成文件名与约定的静态 URL。
  pub fn simulate_stylization(preset: Preset) -> ResponseRecord {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let filename = format!("simulated_{}_{}.jpg", preset.file_stem(), timestamp);

    info!("合成模拟风格化响应: {}", filename);

    let mut record = ResponseRecord::for_preset(preset);
    record.success = true;
    record.fallback = true;
    record.message = format!(
      "{} simulation complete! Camera capture was unavailable, so no real photo was taken. \
       Check camera permissions or close other apps using the camera.",
      preset.display_name()
    );
    record.image_url = format!("{}/{}", STATIC_URL_PREFIX, filename);
    record
  }

  /// 合成一条模拟的表情读数
  ///
  /// 标签在七种表情中均匀选取，置信度均匀落在 [75, 95]。
  pub fn simulate_emotion() -> EmotionReading {
    let mut rng = rand::thread_rng();
    let emotion = Emotion::ALL[rng.gen_range(0..Emotion::ALL.len())];
    let confidence: f32 = rng.gen_range(75.0..95.0);

    info!("合成模拟表情读数: {} ({:.1}%)", emotion, confidence);

    EmotionReading {
      success: true,
      emotion,
      confidence,
      emoji: emotion.emoji().to_string(),
      message: format!(
        "Simulated emotion detection: {} with {:.1}% confidence (Camera not available)",
        emotion, confidence
      ),
      fallback: true,
    }
  }
}
