// 该文件是 Huiying（绘影）项目的一部分。
// src/input/base64_image.rs - Base64 内联图像帧来源
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

use anyhow::Result;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::RgbImage;

use super::{Frame, FrameSource, InputError, SourceKind};

/// Base64 内联图像帧来源
///
/// 接受浏览器端上传的 `data:image/jpeg;base64,...` 数据 URL
/// 或裸 Base64 负载，一次性产出解码后的帧。
pub struct Base64Source {
  /// 解码后的图像
  image: Option<RgbImage>,
  /// 图像宽度
  width: u32,
  /// 图像高度
  height: u32,
}

impl Base64Source {
  /// 从 Base64 负载创建帧来源
  pub fn new(payload: &str) -> Result<Self, InputError> {
    // 剥去数据 URL 前缀（data:image/jpeg;base64, 等）
    let raw = match payload.split_once("base64,") {
      Some((_, rest)) => rest,
      None => payload,
    };

    let bytes = STANDARD.decode(raw.trim())?;
    let img = image::load_from_memory(&bytes)?.to_rgb8();

    let width = img.width();
    let height = img.height();

    Ok(Self {
      image: Some(img),
      width,
      height,
    })
  }
}

impl Iterator for Base64Source {
  type Item = Result<Frame>;

  fn next(&mut self) -> Option<Self::Item> {
    self.image.take().map(|image| {
      Ok(Frame {
        image,
        index: 0,
        timestamp_ms: 0,
      })
    })
  }
}

impl FrameSource for Base64Source {
  fn kind(&self) -> SourceKind {
    SourceKind::Base64
  }

  fn width(&self) -> u32 {
    self.width
  }

  fn height(&self) -> u32 {
    self.height
  }

  fn fps(&self) -> Option<f64> {
    None
  }
}
