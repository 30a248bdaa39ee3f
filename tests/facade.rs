// 该文件是 Huiying（绘影）项目的一部分。
// tests/facade.rs - 门面端到端测试
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

use std::io::Cursor;
use std::path::PathBuf;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::{Rgb, RgbImage};

use huiying::facade::{FacadeConfig, MoodFilterFacade, StylizeRequest};
use huiying::preset::Preset;

fn test_config(tag: &str) -> FacadeConfig {
  FacadeConfig {
    output_dir: std::env::temp_dir().join(format!(
      "huiying-e2e-{}-{}-{}",
      tag,
      std::process::id(),
      std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos()
    )),
    devices: vec![PathBuf::from("/dev/video-no-such-device")],
    headless_countdown: Duration::from_secs(0),
    windowed_countdown: Duration::from_secs(0),
    stylize_seed: Some(7),
  }
}

/// 生成一张带渐变的测试图并编码为数据 URL
fn gradient_payload(width: u32, height: u32) -> String {
  let img = RgbImage::from_fn(width, height, |x, y| {
    Rgb([
      (x * 255 / width.max(1)) as u8,
      (y * 255 / height.max(1)) as u8,
      128,
    ])
  });
  let mut buf = Vec::new();
  img
    .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Jpeg)
    .unwrap();
  format!("data:image/jpeg;base64,{}", STANDARD.encode(&buf))
}

#[test]
fn stylization_round_trip_with_supplied_image() {
  let config = test_config("roundtrip");
  let out_dir = config.output_dir.clone();
  let facade = MoodFilterFacade::new(config);

  let record = facade.handle(
    &StylizeRequest::new("Shinkai").with_image(gradient_payload(96, 72)),
  );

  assert!(record.success);
  assert!(!record.fallback);
  assert_eq!(record.style, "Shinkai");
  assert!(record.image_url.starts_with("/static/anime_captures/"));

  // 内联负载可解码且形状与输入一致
  let decoded = STANDARD.decode(record.image_data.as_ref().unwrap()).unwrap();
  let img = image::load_from_memory(&decoded).unwrap();
  assert_eq!((img.width(), img.height()), (96, 72));

  // 落盘文件存在且可重新解码
  let stylized_name = record.image_url.rsplit('/').next().unwrap();
  let stylized_path = out_dir.join(stylized_name);
  assert!(stylized_path.exists());
  let reloaded = image::ImageReader::open(&stylized_path)
    .unwrap()
    .decode()
    .unwrap();
  assert_eq!((reloaded.width(), reloaded.height()), (96, 72));

  std::fs::remove_dir_all(&out_dir).ok();
}

#[test]
fn every_preset_produces_a_well_formed_record() {
  let config = test_config("presets");
  let out_dir = config.output_dir.clone();
  let facade = MoodFilterFacade::new(config);

  for preset in Preset::ALL {
    let record = facade.handle(
      &StylizeRequest::new(preset.identifier()).with_image(gradient_payload(64, 48)),
    );
    assert!(record.success, "{} 应当成功", preset.identifier());
    assert!(!record.fallback);
    assert_eq!(record.style, preset.identifier());
    assert_eq!(record.style_name, preset.display_name());
    assert!(record.image_data.is_some());
    let filename = record.image_url.rsplit('/').next().unwrap();
    assert!(filename.starts_with(&format!("{}_", preset.file_stem())));
    assert!(filename.ends_with(".jpg"));
  }

  std::fs::remove_dir_all(&out_dir).ok();
}

#[test]
fn camera_failure_degrades_to_simulation() {
  let facade = MoodFilterFacade::new(test_config("degrade"));

  for preset in Preset::ALL {
    let record = facade.handle(&StylizeRequest::new(preset.identifier()));
    assert!(record.success);
    assert!(record.fallback);
    assert!(record.image_data.is_none());
    let filename = record.image_url.rsplit('/').next().unwrap();
    assert!(filename.starts_with(&format!("simulated_{}_", preset.file_stem())));
  }
}

#[test]
fn unknown_style_is_a_structured_error() {
  let facade = MoodFilterFacade::new(test_config("unknown"));
  let record = facade.handle(&StylizeRequest::new("Ghibli"));

  assert!(!record.success);
  assert!(!record.fallback);
  assert_eq!(record.style, "Ghibli");
  assert!(record.error.is_some());
  for p in Preset::ALL {
    assert!(record.message.contains(p.identifier()));
  }

  // 序列化后仍是统一响应形状
  let json = serde_json::to_value(&record).unwrap();
  assert!(json.get("success").is_some());
  assert!(json.get("image_url").is_some());
}

#[test]
fn concurrent_requests_stay_well_formed() {
  let config = test_config("concurrent");
  let out_dir = config.output_dir.clone();
  let facade = std::sync::Arc::new(MoodFilterFacade::new(config));

  let mut handles = Vec::new();
  for i in 0..4u32 {
    let facade = facade.clone();
    handles.push(std::thread::spawn(move || {
      let preset = Preset::ALL[(i as usize) % Preset::ALL.len()];
      let request = if i % 2 == 0 {
        // 偶数线程带图像，奇数线程走摄像头失败降级
        StylizeRequest::new(preset.identifier()).with_image(gradient_payload(40, 30))
      } else {
        StylizeRequest::new(preset.identifier())
      };
      facade.handle(&request)
    }));
  }

  for handle in handles {
    let record = handle.join().unwrap();
    assert!(record.success);
    assert!(!record.style_name.is_empty());
    assert!(record.image_url.starts_with("/static/anime_captures/"));
  }

  std::fs::remove_dir_all(&out_dir).ok();
}
