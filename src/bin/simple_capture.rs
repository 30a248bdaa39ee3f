// 该文件是 Huiying（绘影）项目的一部分。
// src/bin/simple_capture.rs - 捕获与风格化测试代码
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, Wareless Group

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use huiying::capture::CaptureMode;
use huiying::facade::{FacadeConfig, MoodFilterFacade, StylizeRequest};
use huiying::preset::Preset;

/// Huiying 捕获与风格化参数配置
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
  /// 风格预设（Hayao / Shinkai / Paprika）
  #[arg(long, value_name = "STYLE")]
  pub style: Preset,
  /// 输出目录
  #[arg(long, value_name = "DIR", default_value = "static/anime_captures")]
  pub output_dir: PathBuf,
  /// 捕获模式（headless / windowed）
  #[arg(long, value_name = "MODE", default_value = "headless")]
  pub mode: CaptureMode,
  /// 倒计时秒数（缺省时按模式取默认值）
  #[arg(long, value_name = "SECS")]
  pub countdown: Option<u64>,
}

fn main() -> Result<()> {
  tracing_subscriber::fmt::init();

  let args = Args::parse();

  info!("风格预设: {}", args.style);
  info!("输出目录: {}", args.output_dir.display());

  let mut config = FacadeConfig {
    output_dir: args.output_dir,
    ..FacadeConfig::default()
  };
  if let Some(secs) = args.countdown {
    let countdown = Duration::from_secs(secs);
    config.headless_countdown = countdown;
    config.windowed_countdown = countdown;
  }

  let facade = MoodFilterFacade::new(config);
  let record = facade.handle(&StylizeRequest::new(args.style.identifier()).with_mode(args.mode));

  println!("{}", serde_json::to_string_pretty(&record)?);
  Ok(())
}
