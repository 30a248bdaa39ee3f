// 该文件是 Huiying（绘影）项目的一部分。
// src/input/image_file.rs - 图片文件帧来源
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

use anyhow::{Context, Result};
use image::{ImageReader, RgbImage};
use std::path::Path;

use super::{Frame, FrameSource, SourceKind};

/// 图片文件帧来源
///
/// 一次性来源：整个生命周期只产出一帧。
pub struct ImageFileSource {
  /// 解码后的图像
  image: Option<RgbImage>,
  /// 图像宽度
  width: u32,
  /// 图像高度
  height: u32,
}

impl ImageFileSource {
  /// 从文件路径创建图片帧来源
  pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
    let path = path.as_ref();
    let img = ImageReader::open(path)
      .with_context(|| format!("无法打开图片文件: {}", path.display()))?
      .decode()
      .with_context(|| format!("无法解码图片文件: {}", path.display()))?
      .to_rgb8();

    let width = img.width();
    let height = img.height();

    Ok(Self {
      image: Some(img),
      width,
      height,
    })
  }
}

impl Iterator for ImageFileSource {
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

impl FrameSource for ImageFileSource {
  fn kind(&self) -> SourceKind {
    SourceKind::ImageFile
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

#[cfg(test)]
mod tests {
  use super::*;
  use image::Rgb;
  use std::path::PathBuf;

  fn temp_png(tag: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
      "huiying-imgsrc-{}-{}-{}.png",
      tag,
      std::process::id(),
      std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos()
    ));
    RgbImage::from_pixel(20, 10, Rgb([30, 60, 90]))
      .save(&path)
      .unwrap();
    path
  }

  #[test]
  fn yields_exactly_one_frame() {
    let path = temp_png("once");
    let mut source = ImageFileSource::new(&path).unwrap();
    assert_eq!((source.width(), source.height()), (20, 10));
    assert!(matches!(source.kind(), SourceKind::ImageFile));
    assert!(source.fps().is_none());

    let frame = source.next().unwrap().unwrap();
    assert_eq!(frame.image.dimensions(), (20, 10));
    assert_eq!(frame.image.get_pixel(0, 0).0, [30, 60, 90]);
    assert!(source.next().is_none());

    std::fs::remove_file(&path).ok();
  }

  #[test]
  fn missing_file_is_an_error() {
    assert!(ImageFileSource::new("/no/such/huiying-image.png").is_err());
  }
}
