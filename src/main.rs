// 该文件是 Huiying（绘影）项目的一部分。
// src/main.rs - 项目主程序
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, Wareless Group

use std::io::Write;

use anyhow::Result;

use huiying::capture::{CaptureMode, display_available};
use huiying::facade::{MoodFilterFacade, StylizeRequest};
use huiying::preset::Preset;

fn main() -> Result<()> {
  tracing_subscriber::fmt::init();

  println!("Huiying 动漫心情滤镜");
  println!("====================");
  println!();
  println!("可用风格:");
  for preset in Preset::ALL {
    println!(
      "  {} - {} ({})",
      preset.identifier(),
      preset.display_name(),
      preset.description()
    );
  }
  println!();

  let mode = if display_available() {
    println!("检测到图形环境，使用窗口预览模式");
    CaptureMode::Windowed
  } else {
    println!("无图形环境，使用无头倒计时模式");
    CaptureMode::Headless
  };
  println!();

  let facade = MoodFilterFacade::default();

  loop {
    print!("请输入风格名称（回车退出）: ");
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    let choice = line.trim();
    if choice.is_empty() {
      break;
    }

    let record = facade.handle(&StylizeRequest::new(choice).with_mode(mode));
    println!("{}", serde_json::to_string_pretty(&record)?);
    println!();
  }

  println!("再见!");
  Ok(())
}
