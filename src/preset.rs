// 该文件是 Huiying（绘影）项目的一部分。
// src/preset.rs - 动漫风格预设表
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
use std::str::FromStr;

/// 动漫风格预设
///
/// 预设表在进程启动时固定，运行期间只读。
/// 各项数值参数（色温、饱和度、边缘混合权重、调色板大小）
/// 决定了风格化管线的风格尾段行为。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Preset {
  /// 宫崎骏风格：温暖柔和的色彩
  Hayao,
  /// 新海诚风格：鲜艳饱和的色彩
  Shinkai,
  /// 今敏风格：迷幻强烈的色彩
  Paprika,
}

impl Preset {
  /// 全部预设（用于校验与错误提示中的枚举）
  pub const ALL: [Preset; 3] = [Preset::Hayao, Preset::Shinkai, Preset::Paprika];

  /// 按名称解析预设（大小写不敏感），未知名称返回 None
  pub fn from_name(name: &str) -> Option<Preset> {
    match name.to_ascii_lowercase().as_str() {
      "hayao" => Some(Preset::Hayao),
      "shinkai" => Some(Preset::Shinkai),
      "paprika" => Some(Preset::Paprika),
      _ => None,
    }
  }

  /// 预设标识符
  pub fn identifier(&self) -> &'static str {
    match self {
      Preset::Hayao => "Hayao",
      Preset::Shinkai => "Shinkai",
      Preset::Paprika => "Paprika",
    }
  }

  /// 面向用户的风格名称
  pub fn display_name(&self) -> &'static str {
    match self {
      Preset::Hayao => "Studio Ghibli Style",
      Preset::Shinkai => "Makoto Shinkai Style",
      Preset::Paprika => "Satoshi Kon Style",
    }
  }

  /// 面向用户的风格描述
  pub fn description(&self) -> &'static str {
    match self {
      Preset::Hayao => "Warm, soft colors inspired by Miyazaki films",
      Preset::Shinkai => "Vibrant, saturated colors with dramatic lighting",
      Preset::Paprika => "Psychedelic, intense colors with surreal effects",
    }
  }

  /// 色温系数（>1 偏暖，<1 偏冷）
  pub fn color_temperature(&self) -> f32 {
    match self {
      Preset::Hayao => 1.1,
      Preset::Shinkai => 1.0,
      Preset::Paprika => 0.9,
    }
  }

  /// 饱和度系数
  pub fn saturation(&self) -> f32 {
    match self {
      Preset::Hayao => 1.0,
      Preset::Shinkai => 1.3,
      Preset::Paprika => 1.4,
    }
  }

  /// 边缘混合权重
  pub fn edge_weight(&self) -> f32 {
    match self {
      Preset::Hayao => 0.10,
      Preset::Shinkai => 0.15,
      Preset::Paprika => 0.20,
    }
  }

  /// 边缘叠加的加权混合系数 (α, β)
  pub fn blend_weights(&self) -> (f32, f32) {
    match self {
      Preset::Hayao => (0.9, 0.10),
      Preset::Shinkai => (0.85, 0.15),
      Preset::Paprika => (0.8, 0.20),
    }
  }

  /// 调色板大小（K-means 聚类数）
  pub fn palette_size(&self) -> usize {
    match self {
      Preset::Paprika => 12,
      _ => 8,
    }
  }

  /// 文件名用的小写词干
  pub fn file_stem(&self) -> &'static str {
    match self {
      Preset::Hayao => "hayao",
      Preset::Shinkai => "shinkai",
      Preset::Paprika => "paprika",
    }
  }
}

impl fmt::Display for Preset {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.identifier())
  }
}

impl FromStr for Preset {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Preset::from_name(s).ok_or_else(|| {
      format!(
        "unknown preset '{}', accepted presets: {}",
        s,
        Preset::ALL.map(|p| p.identifier()).join(", ")
      )
    })
  }
}
