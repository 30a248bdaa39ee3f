// 该文件是 Huiying（绘影）项目的一部分。
// src/bin/simple_stylize.rs - 单张图片风格化测试代码
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, Wareless Group

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::info;

use huiying::input::create_frame_source;
use huiying::package::ResultPackager;
use huiying::preset::Preset;
use huiying::stylize::Stylizer;

/// Huiying 单张图片风格化参数配置
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
  /// 输入来源（图片路径、data:image 数据 URL 或 /dev/videoN 设备）
  #[arg(long, value_name = "SOURCE")]
  pub input: String,
  /// 风格预设（Hayao / Shinkai / Paprika）
  #[arg(long, value_name = "STYLE")]
  pub style: Preset,
  /// 输出图片路径
  #[arg(long, value_name = "OUTPUT")]
  pub output: String,
  /// 调色板量化随机种子
  #[arg(long, value_name = "SEED")]
  pub seed: Option<u64>,
  /// 同时保存原图/效果图对比拼图（写入输出同目录）
  #[arg(long)]
  pub compare: bool,
}

fn main() -> Result<()> {
  tracing_subscriber::fmt::init();

  let args = Args::parse();

  info!("输入图片: {}", args.input);
  info!("风格预设: {}", args.style);
  info!("输出路径: {}", args.output);

  let mut source = create_frame_source(&args.input)
    .with_context(|| format!("无法打开输入来源: {}", args.input))?;
  info!("输入来源已打开: {}x{}", source.width(), source.height());

  let Some(frame) = source.next() else {
    bail!("输入来源没有产出任何帧: {}", args.input);
  };
  let image = frame?.image;

  let mut stylizer = Stylizer::new(args.style);
  if let Some(seed) = args.seed {
    stylizer = stylizer.with_seed(seed);
  }

  info!("开始风格化...");
  let now = std::time::Instant::now();
  let stylized = stylizer.apply(&image)?;
  info!("风格化完成，耗时: {:.2?}", now.elapsed());

  stylized
    .save(&args.output)
    .with_context(|| format!("无法保存输出图片: {}", args.output))?;
  info!("已保存: {}", args.output);

  if args.compare {
    let dir = std::path::Path::new(&args.output)
      .parent()
      .filter(|p| !p.as_os_str().is_empty())
      .unwrap_or_else(|| std::path::Path::new("."));
    let packager = ResultPackager::new(dir);
    packager.save_comparison(&image, &stylized, args.style)?;
  }

  Ok(())
}
