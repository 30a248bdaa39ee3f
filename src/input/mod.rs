// 该文件是 Huiying（绘影）项目的一部分。
// src/input/mod.rs - 帧来源模块
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

mod base64_image;
#[cfg(feature = "v4l2_camera")]
mod camera;
mod image_file;

use anyhow::Result;
use image::RgbImage;
use thiserror::Error;

pub use base64_image::Base64Source;
#[cfg(feature = "v4l2_camera")]
pub use camera::{CameraSource, DEFAULT_DEVICE_CANDIDATES};
pub use image_file::ImageFileSource;

/// 帧数据
///
/// 像素缓冲为 RGB 交错存储，创建后不再修改。
pub struct Frame {
  /// RGB 图像数据
  pub image: RgbImage,
  /// 帧索引
  pub index: u64,
  /// 时间戳（毫秒）
  pub timestamp_ms: u64,
}

/// 帧来源类型
pub enum SourceKind {
  /// 图片文件
  ImageFile,
  /// Base64 编码图像
  Base64,
  /// V4L2 摄像头
  Camera,
}

/// 输入错误
#[derive(Error, Debug)]
pub enum InputError {
  #[error("没有可用的摄像头后端")]
  BackendUnavailable,
  #[error("帧读取失败: {0}")]
  FrameRead(String),
  #[error("I/O 错误: {0}")]
  Io(#[from] std::io::Error),
  #[error("图像错误: {0}")]
  Image(#[from] image::ImageError),
  #[error("Base64 解码错误: {0}")]
  Base64(#[from] base64::DecodeError),
  #[error("不支持的输入来源: {0}")]
  UnsupportedSource(String),
}

/// 帧来源 trait
///
/// 与输入迭代器统一：每次 `next` 产出一帧或一个错误。
pub trait FrameSource: Iterator<Item = Result<Frame>> {
  /// 获取来源类型
  fn kind(&self) -> SourceKind;

  /// 获取帧宽度
  fn width(&self) -> u32;

  /// 获取帧高度
  fn height(&self) -> u32;

  /// 获取帧率（如果适用）
  fn fps(&self) -> Option<f64>;
}

/// 从描述字符串创建帧来源
///
/// - `/dev/videoN` 或 `v4l2://...` 视为摄像头设备
/// - `data:image/...;base64,...` 视为内联 Base64 图像
/// - 其余视为图片文件路径
pub fn create_frame_source(source: &str) -> Result<Box<dyn FrameSource>> {
  if source.starts_with("/dev/video") || source.starts_with("v4l2://") {
    #[cfg(feature = "v4l2_camera")]
    {
      let device_path = source.trim_start_matches("v4l2://");
      let candidates = vec![std::path::PathBuf::from(device_path)];
      return CameraSource::probe(&candidates)
        .map(|s| Box::new(s) as Box<dyn FrameSource>)
        .ok_or_else(|| InputError::BackendUnavailable.into());
    }
    #[cfg(not(feature = "v4l2_camera"))]
    {
      return Err(InputError::UnsupportedSource(source.to_string()).into());
    }
  }

  if source.starts_with("data:image") {
    return Ok(Box::new(Base64Source::new(source)?));
  }

  Ok(Box::new(ImageFileSource::new(source)?))
}

#[cfg(test)]
mod tests {
  use super::*;
  use base64::Engine;
  use base64::engine::general_purpose::STANDARD;
  use image::Rgb;
  use std::io::Cursor;

  #[test]
  fn dispatch_data_url_to_base64_source() {
    let img = RgbImage::from_pixel(24, 16, Rgb([100, 150, 200]));
    let mut buf = Vec::new();
    img
      .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Jpeg)
      .unwrap();
    let payload = format!("data:image/jpeg;base64,{}", STANDARD.encode(&buf));

    let mut source = create_frame_source(&payload).unwrap();
    assert!(matches!(source.kind(), SourceKind::Base64));
    let frame = source.next().unwrap().unwrap();
    assert_eq!(frame.image.dimensions(), (24, 16));
  }

  #[test]
  fn dispatch_path_to_image_file_source() {
    let path = std::env::temp_dir().join(format!(
      "huiying-dispatch-{}-{}.png",
      std::process::id(),
      std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos()
    ));
    RgbImage::from_pixel(8, 6, Rgb([1, 2, 3]))
      .save(&path)
      .unwrap();

    let source = create_frame_source(path.to_str().unwrap()).unwrap();
    assert!(matches!(source.kind(), SourceKind::ImageFile));
    assert_eq!((source.width(), source.height()), (8, 6));

    std::fs::remove_file(&path).ok();
  }

  #[test]
  fn dispatch_missing_path_fails() {
    assert!(create_frame_source("/no/such/huiying-input.png").is_err());
  }

  #[test]
  #[cfg(feature = "v4l2_camera")]
  fn dispatch_missing_device_fails() {
    assert!(create_frame_source("/dev/video-no-such-device").is_err());
    assert!(create_frame_source("v4l2:///dev/video-no-such-device").is_err());
  }
}
