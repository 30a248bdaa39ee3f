// 该文件是 Huiying（绘影）项目的一部分。
// src/facade.rs - 请求门面（校验、编排、降级、打包）
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

use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

use crate::capture::{
  CaptureMode, CaptureOutcome, CaptureSession, DEFAULT_HEADLESS_COUNTDOWN,
  DEFAULT_WINDOWED_COUNTDOWN,
};
use crate::fallback::FallbackResponder;
use crate::input::Base64Source;
use crate::package::ResultPackager;
use crate::preset::Preset;
use crate::response::ResponseRecord;
use crate::stylize::Stylizer;

/// 门面配置
///
/// 显式的应用上下文对象：除了这里的只读配置，
/// 门面不持有任何进程级可变状态，因此可按请求重入。
#[derive(Debug, Clone)]
pub struct FacadeConfig {
  /// 输出目录
  pub output_dir: PathBuf,
  /// 摄像头设备候选列表
  pub devices: Vec<PathBuf>,
  /// 无头模式倒计时
  pub headless_countdown: Duration,
  /// 窗口模式倒计时
  pub windowed_countdown: Duration,
  /// 固定的风格化随机种子（None 表示每次请求随机）
  pub stylize_seed: Option<u64>,
}

impl Default for FacadeConfig {
  fn default() -> Self {
    Self {
      output_dir: PathBuf::from("static/anime_captures"),
      devices: default_device_candidates(),
      headless_countdown: DEFAULT_HEADLESS_COUNTDOWN,
      windowed_countdown: DEFAULT_WINDOWED_COUNTDOWN,
      stylize_seed: None,
    }
  }
}

fn default_device_candidates() -> Vec<PathBuf> {
  #[cfg(feature = "v4l2_camera")]
  {
    crate::input::DEFAULT_DEVICE_CANDIDATES
      .iter()
      .map(PathBuf::from)
      .collect()
  }
  #[cfg(not(feature = "v4l2_camera"))]
  {
    Vec::new()
  }
}

/// 风格化请求
#[derive(Debug, Clone)]
pub struct StylizeRequest {
  /// 预设标识符（未知值会被拒绝）
  pub style: String,
  /// 捕获模式（Web 层调用默认无头）
  pub mode: CaptureMode,
  /// 调用方自带的 Base64 图像；存在时跳过帧来源
  pub image: Option<String>,
}

impl StylizeRequest {
  /// 以默认无头模式构造请求
  pub fn new<S: Into<String>>(style: S) -> Self {
    Self {
      style: style.into(),
      mode: CaptureMode::Headless,
      image: None,
    }
  }

  /// 指定捕获模式
  pub fn with_mode(mut self, mode: CaptureMode) -> Self {
    self.mode = mode;
    self
  }

  /// 附带调用方图像（绕过帧来源）
  pub fn with_image<S: Into<String>>(mut self, image: S) -> Self {
    self.image = Some(image.into());
    self
  }
}

/// 心情滤镜门面
///
/// Web 层的唯一入口。内部错误一律在此边界被吸收并转换为
/// `ResponseRecord`，绝不向调用方抛出。
pub struct MoodFilterFacade {
  config: FacadeConfig,
  packager: ResultPackager,
}

impl Default for MoodFilterFacade {
  fn default() -> Self {
    Self::new(FacadeConfig::default())
  }
}

impl MoodFilterFacade {
  /// 以给定配置创建门面
  pub fn new(config: FacadeConfig) -> Self {
    let packager = ResultPackager::new(&config.output_dir);
    Self { config, packager }
  }

  /// 处理一次风格化请求
  ///
  /// 状态机：校验预设 → 获取帧（自带图像或捕获会话）→
  /// 风格化 → 打包；帧来源或风格化失败走降级响应。
  pub fn handle(&self, request: &StylizeRequest) -> ResponseRecord {
    let Some(preset) = Preset::from_name(&request.style) else {
      warn!("拒绝未知预设: {}", request.style);
      return ResponseRecord::invalid_preset(&request.style);
    };

    info!("处理 {} 风格化请求（模式 {:?}）", preset, request.mode);

    // 获取帧：调用方自带图像优先，否则走捕获会话
    let frame = if let Some(payload) = &request.image {
      match Base64Source::new(payload).map(|mut s| s.next()) {
        Ok(Some(Ok(frame))) => frame.image,
        Ok(_) | Err(_) => {
          warn!("调用方图像解码失败");
          let mut record = ResponseRecord::for_preset(preset);
          record.message = "The supplied image could not be decoded.".to_string();
          record.error = Some("invalid image data".to_string());
          return record;
        }
      }
    } else {
      let countdown = match request.mode {
        CaptureMode::Headless => self.config.headless_countdown,
        CaptureMode::Windowed => self.config.windowed_countdown,
      };
      let session = CaptureSession::new(preset, request.mode)
        .with_devices(self.config.devices.clone())
        .with_countdown(countdown);

      match session.run() {
        CaptureOutcome::Captured(frame) => frame.image,
        CaptureOutcome::Cancelled => {
          info!("会话被用户取消");
          return ResponseRecord::cancelled(preset);
        }
        CaptureOutcome::BackendFailed | CaptureOutcome::ReadFailed => {
          info!("摄像头不可用，走降级响应");
          return FallbackResponder::simulate_stylization(preset);
        }
      }
    };

    // 风格化
    let mut stylizer = Stylizer::new(preset);
    if let Some(seed) = self.config.stylize_seed {
      stylizer = stylizer.with_seed(seed);
    }
    let stylized = match stylizer.apply(&frame) {
      Ok(stylized) => stylized,
      Err(e) => {
        warn!("风格化失败: {}", e);
        // 素材仍有价值：尽力保留原始帧后再降级
        self.packager.persist_original(&frame);
        return FallbackResponder::simulate_stylization(preset);
      }
    };

    // 打包
    let record = self.packager.package(preset, &frame, &stylized).into_record();
    info!(
      "请求完成: success={} fallback={}",
      record.success, record.fallback
    );
    record
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use base64::Engine;
  use base64::engine::general_purpose::STANDARD;
  use image::{Rgb, RgbImage};
  use std::io::Cursor;

  fn test_config(tag: &str) -> FacadeConfig {
    FacadeConfig {
      output_dir: std::env::temp_dir().join(format!(
        "huiying-facade-{}-{}-{}",
        tag,
        std::process::id(),
        std::time::SystemTime::now()
          .duration_since(std::time::UNIX_EPOCH)
          .unwrap()
          .as_nanos()
      )),
      // 指向不存在的设备，保证测试不碰真实摄像头
      devices: vec![PathBuf::from("/dev/video-no-such-device")],
      headless_countdown: Duration::from_secs(0),
      windowed_countdown: Duration::from_secs(0),
      stylize_seed: Some(42),
    }
  }

  fn jpeg_payload(color: Rgb<u8>) -> String {
    let img = RgbImage::from_pixel(48, 36, color);
    let mut buf = Vec::new();
    img
      .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Jpeg)
      .unwrap();
    format!("data:image/jpeg;base64,{}", STANDARD.encode(&buf))
  }

  #[test]
  fn invalid_preset_is_rejected_without_files() {
    let config = test_config("invalid");
    let out_dir = config.output_dir.clone();
    let facade = MoodFilterFacade::new(config);

    let record = facade.handle(&StylizeRequest::new("Miyazaki"));
    assert!(!record.success);
    assert!(!record.fallback);
    for p in Preset::ALL {
      assert!(record.message.contains(p.identifier()));
    }
    assert!(!out_dir.exists());
  }

  #[test]
  fn camera_failure_yields_fallback_for_every_preset() {
    let facade = MoodFilterFacade::new(test_config("fallback"));
    for preset in Preset::ALL {
      let record = facade.handle(&StylizeRequest::new(preset.identifier()));
      assert!(record.success);
      assert!(record.fallback);
      let filename = record.image_url.rsplit('/').next().unwrap();
      assert!(filename.starts_with(&format!("simulated_{}_", preset.file_stem())));
    }
  }

  #[test]
  fn supplied_image_bypasses_camera_and_persists() {
    let config = test_config("bypass");
    let out_dir = config.output_dir.clone();
    let facade = MoodFilterFacade::new(config);

    let request = StylizeRequest::new("Shinkai").with_image(jpeg_payload(Rgb([50, 100, 150])));
    let record = facade.handle(&request);

    assert!(record.success);
    assert!(!record.fallback);
    assert_eq!(record.style, "Shinkai");
    assert_eq!(record.style_name, "Makoto Shinkai Style");

    // 内联负载解码后形状不变
    let decoded = STANDARD.decode(record.image_data.unwrap()).unwrap();
    let img = image::load_from_memory(&decoded).unwrap();
    assert_eq!((img.width(), img.height()), (48, 36));

    // 原图与风格化图都已落盘
    let names: Vec<String> = std::fs::read_dir(&out_dir)
      .unwrap()
      .map(|e| e.unwrap().file_name().into_string().unwrap())
      .collect();
    assert!(names.iter().any(|n| n.starts_with("original_")));
    assert!(names.iter().any(|n| n.starts_with("shinkai_")));

    std::fs::remove_dir_all(&out_dir).ok();
  }

  #[test]
  fn undecodable_image_is_reported_not_panicked() {
    let facade = MoodFilterFacade::new(test_config("garbage"));
    let request = StylizeRequest::new("Hayao").with_image("data:image/jpeg;base64,@@@@");
    let record = facade.handle(&request);
    assert!(!record.success);
    assert!(record.error.is_some());
  }

  #[test]
  fn response_shape_is_uniform() {
    let facade = MoodFilterFacade::new(test_config("shape"));
    for request in [
      StylizeRequest::new("Paprika"),
      StylizeRequest::new("nope"),
      StylizeRequest::new("Hayao").with_image(jpeg_payload(Rgb([128, 128, 128]))),
    ] {
      let record = facade.handle(&request);
      let json = serde_json::to_value(&record).unwrap();
      for key in [
        "success",
        "style",
        "style_name",
        "description",
        "message",
        "image_url",
        "fallback",
      ] {
        assert!(json.get(key).is_some(), "missing key {}", key);
      }
    }
  }
}
