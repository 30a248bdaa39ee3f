// 该文件是 Huiying（绘影）项目的一部分。
// src/emotion.rs - 表情分类器的输出契约
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
use std::fmt;

/// 七种表情标签
///
/// 本项目不实现分类器本身，只约定其输出契约；
/// 任何满足该契约的外部实现都可以接入聊天层。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
  Happy,
  Sad,
  Angry,
  Surprise,
  Fear,
  Disgust,
  Neutral,
}

impl Emotion {
  /// 全部标签
  pub const ALL: [Emotion; 7] = [
    Emotion::Happy,
    Emotion::Sad,
    Emotion::Angry,
    Emotion::Surprise,
    Emotion::Fear,
    Emotion::Disgust,
    Emotion::Neutral,
  ];

  /// 标签文本
  pub fn label(&self) -> &'static str {
    match self {
      Emotion::Happy => "happy",
      Emotion::Sad => "sad",
      Emotion::Angry => "angry",
      Emotion::Surprise => "surprise",
      Emotion::Fear => "fear",
      Emotion::Disgust => "disgust",
      Emotion::Neutral => "neutral",
    }
  }

  /// 展示用表情符号
  pub fn emoji(&self) -> &'static str {
    match self {
      Emotion::Happy => "😊",
      Emotion::Sad => "😢",
      Emotion::Angry => "😠",
      Emotion::Surprise => "😲",
      Emotion::Fear => "😨",
      Emotion::Disgust => "🤢",
      Emotion::Neutral => "😐",
    }
  }
}

impl fmt::Display for Emotion {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.label())
  }
}

/// 表情读数（分类器输出契约）
#[derive(Debug, Clone, Serialize)]
pub struct EmotionReading {
  /// 是否成功
  pub success: bool,
  /// 表情标签
  pub emotion: Emotion,
  /// 置信度（0..100）
  pub confidence: f32,
  /// 展示用表情符号
  pub emoji: String,
  /// 面向用户的状态消息
  pub message: String,
  /// 是否为模拟结果
  pub fallback: bool,
}
