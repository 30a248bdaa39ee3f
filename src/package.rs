// 该文件是 Huiying（绘影）项目的一部分。
// src/package.rs - 结果打包器（持久化与传输编码）
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

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::Local;
use image::imageops::FilterType;
use image::{GenericImage, RgbImage};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use crate::preset::Preset;
use crate::response::ResponseRecord;

/// 静态目录下的输出子路径（聊天前端按此约定取图）
pub const STATIC_URL_PREFIX: &str = "/static/anime_captures";

/// 打包错误
#[derive(Error, Debug)]
pub enum PackageError {
  #[error("I/O 错误: {0}")]
  Io(#[from] std::io::Error),
  #[error("图像错误: {0}")]
  Image(#[from] image::ImageError),
}

/// 一次风格化的打包结果
///
/// 创建后不可变；磁盘上的图像文件比该结构活得更久。
pub struct StylizationResult {
  /// 预设
  pub preset: Preset,
  /// 时间戳（YYYYMMDD_HHMMSS）
  pub timestamp: String,
  /// 原始帧的持久化路径（写失败时为 None）
  pub original_path: Option<PathBuf>,
  /// 风格化帧的持久化路径（写失败时为 None）
  pub stylized_path: Option<PathBuf>,
  /// 风格化帧的 Base64 JPEG
  pub image_base64: Option<String>,
  /// 持久化诊断（仅写失败时）
  pub persistence_issue: Option<String>,
}

impl StylizationResult {
  /// 转换为统一响应记录
  pub fn into_record(self) -> ResponseRecord {
    let stylized_name = format!("{}_{}.jpg", self.preset.file_stem(), self.timestamp);

    let mut record = ResponseRecord::for_preset(self.preset);
    record.success = true;
    record.image_url = format!("{}/{}", STATIC_URL_PREFIX, stylized_name);
    record.image_data = self.image_base64;
    record.message = match self.persistence_issue {
      None => format!(
        "Successfully applied {} filter!",
        self.preset.display_name()
      ),
      Some(issue) => format!(
        "Applied {} filter, but the result could not be saved ({}). \
         The image is still attached to this message.",
        self.preset.display_name(),
        issue
      ),
    };
    record
  }
}

/// 结果打包器
///
/// 持久化原图与风格化图，并把风格化图编码为可内联传输的
/// Base64 JPEG。文件名在秒粒度内唯一；写失败时降级为仅返回
/// 内存负载，并在消息中注明。
pub struct ResultPackager {
  /// 输出目录
  output_dir: PathBuf,
}

impl ResultPackager {
  /// 创建指向给定输出目录的打包器
  pub fn new<P: AsRef<Path>>(output_dir: P) -> Self {
    Self {
      output_dir: output_dir.as_ref().to_path_buf(),
    }
  }

  /// 输出目录
  pub fn output_dir(&self) -> &Path {
    &self.output_dir
  }

  /// 打包一次风格化结果
  pub fn package(
    &self,
    preset: Preset,
    original: &RgbImage,
    stylized: &RgbImage,
  ) -> StylizationResult {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();

    // 内存编码先行：即使磁盘不可写，聊天消息仍可携带图像
    let image_base64 = match encode_jpeg_base64(stylized) {
      Ok(data) => Some(data),
      Err(e) => {
        warn!("风格化图像编码失败: {}", e);
        None
      }
    };

    let mut result = StylizationResult {
      preset,
      timestamp: timestamp.clone(),
      original_path: None,
      stylized_path: None,
      image_base64,
      persistence_issue: None,
    };

    if let Err(e) = std::fs::create_dir_all(&self.output_dir) {
      warn!("无法创建输出目录 {}: {}", self.output_dir.display(), e);
      result.persistence_issue = Some("output directory not writable".to_string());
      return result;
    }

    let original_path = self.output_dir.join(format!("original_{}.jpg", timestamp));
    let stylized_path = self
      .output_dir
      .join(format!("{}_{}.jpg", preset.file_stem(), timestamp));

    match original.save(&original_path) {
      Ok(()) => {
        info!("原始帧已保存: {}", original_path.display());
        result.original_path = Some(original_path);
      }
      Err(e) => {
        warn!("原始帧保存失败: {}", e);
        result.persistence_issue = Some("could not save the original frame".to_string());
      }
    }

    match stylized.save(&stylized_path) {
      Ok(()) => {
        info!("风格化帧已保存: {}", stylized_path.display());
        result.stylized_path = Some(stylized_path);
      }
      Err(e) => {
        warn!("风格化帧保存失败: {}", e);
        result.persistence_issue = Some("could not save the stylized frame".to_string());
      }
    }

    result
  }

  /// 尽力持久化原始帧（风格化失败时仍保留素材）
  pub fn persist_original(&self, original: &RgbImage) -> Option<PathBuf> {
    if std::fs::create_dir_all(&self.output_dir).is_err() {
      return None;
    }
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let path = self.output_dir.join(format!("original_{}.jpg", timestamp));
    match original.save(&path) {
      Ok(()) => {
        info!("原始帧已保存: {}", path.display());
        Some(path)
      }
      Err(e) => {
        warn!("原始帧保存失败: {}", e);
        None
      }
    }
  }

  /// 写出原图与风格化图的并排对比图（各缩放为 400x300）
  pub fn save_comparison(
    &self,
    original: &RgbImage,
    stylized: &RgbImage,
    preset: Preset,
  ) -> Result<PathBuf, PackageError> {
    const TILE_W: u32 = 400;
    const TILE_H: u32 = 300;

    std::fs::create_dir_all(&self.output_dir)?;

    let left = image::imageops::resize(original, TILE_W, TILE_H, FilterType::Triangle);
    let right = image::imageops::resize(stylized, TILE_W, TILE_H, FilterType::Triangle);

    let mut canvas = RgbImage::new(TILE_W * 2, TILE_H);
    canvas.copy_from(&left, 0, 0)?;
    canvas.copy_from(&right, TILE_W, 0)?;

    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let path = self
      .output_dir
      .join(format!("compare_{}_{}.jpg", preset.file_stem(), timestamp));
    canvas.save(&path)?;
    info!("对比图已保存: {}", path.display());
    Ok(path)
  }
}

/// 将图像编码为 JPEG 并做 Base64 编码
pub fn encode_jpeg_base64(image: &RgbImage) -> Result<String, PackageError> {
  let mut buf = Vec::new();
  image.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Jpeg)?;
  Ok(STANDARD.encode(&buf))
}
