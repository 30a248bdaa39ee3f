// 该文件是 Huiying（绘影）项目的一部分。
// src/capture/windowed.rs - SDL2 窗口化预览捕获
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

use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::PixelFormatEnum;
use std::time::{Duration, Instant};
use tracing::{info, warn};

use super::{CaptureOutcome, CaptureSession, overlay::PreviewOverlay};
use crate::input::{CameraSource, FrameSource};

/// 每次循环的事件轮询间隔（约等于 30ms 的 waitKey）
const POLL_INTERVAL: Duration = Duration::from_millis(30);

/// 窗口化捕获循环
///
/// SPACE 立即拍摄，ESC 或关窗取消，倒计时归零自动拍摄，
/// 读取错误终止会话。窗口初始化失败时保守退回无头流程。
/// 预览表面随本函数返回销毁，摄像头句柄随 source 析构释放。
pub(super) fn run_windowed(session: &CaptureSession, mut source: CameraSource) -> CaptureOutcome {
  let width = source.width();
  let height = source.height();

  let sdl = match sdl2::init() {
    Ok(sdl) => sdl,
    Err(e) => {
      warn!("SDL 初始化失败（{}），退回无头捕获", e);
      return session.run_headless(source);
    }
  };
  let video = match sdl.video() {
    Ok(video) => video,
    Err(e) => {
      warn!("SDL 视频子系统不可用（{}），退回无头捕获", e);
      return session.run_headless(source);
    }
  };

  let window = match video
    .window(
      &format!("Huiying Preview - {}", session.preset()),
      width,
      height,
    )
    .position_centered()
    .build()
  {
    Ok(window) => window,
    Err(e) => {
      warn!("预览窗口创建失败（{}），退回无头捕获", e);
      return session.run_headless(source);
    }
  };

  let mut canvas = match window.into_canvas().present_vsync().build() {
    Ok(canvas) => canvas,
    Err(e) => {
      warn!("预览画布创建失败（{}），退回无头捕获", e);
      return session.run_headless(source);
    }
  };
  let texture_creator = canvas.texture_creator();
  let mut texture =
    match texture_creator.create_texture_streaming(PixelFormatEnum::RGB24, width, height) {
      Ok(texture) => texture,
      Err(e) => {
        warn!("预览纹理创建失败（{}），退回无头捕获", e);
        return session.run_headless(source);
      }
    };

  let mut event_pump = match sdl.event_pump() {
    Ok(pump) => pump,
    Err(e) => {
      warn!("SDL 事件泵不可用（{}），退回无头捕获", e);
      return session.run_headless(source);
    }
  };

  let overlay = PreviewOverlay::new();
  let deadline = Instant::now() + session.countdown();

  info!(
    "开始 {} 风格的窗口化捕获，倒计时 {} 秒",
    session.preset(),
    session.countdown().as_secs()
  );

  loop {
    let mut capture_now = false;
    for event in event_pump.poll_iter() {
      match event {
        Event::Quit { .. }
        | Event::KeyDown {
          keycode: Some(Keycode::Escape),
          ..
        } => {
          info!("用户取消捕获");
          return CaptureOutcome::Cancelled;
        }
        Event::KeyDown {
          keycode: Some(Keycode::Space),
          ..
        } => {
          capture_now = true;
        }
        _ => {}
      }
    }

    let frame = match source.next() {
      Some(Ok(frame)) => frame,
      _ => {
        warn!("预览过程中读取帧失败");
        return CaptureOutcome::ReadFailed;
      }
    };

    if capture_now {
      info!("用户按下空格，立即拍摄");
      return CaptureOutcome::Captured(frame);
    }

    let now = Instant::now();
    if now >= deadline {
      info!("倒计时结束，自动拍摄");
      return CaptureOutcome::Captured(frame);
    }
    let remaining_secs = deadline.saturating_duration_since(now).as_secs();

    let preview = overlay.compose(
      &frame.image,
      session.preset(),
      remaining_secs,
      session.countdown().as_secs(),
    );
    if let Err(e) = texture.update(None, preview.as_raw(), (width * 3) as usize) {
      warn!("预览纹理更新失败: {}", e);
      return CaptureOutcome::ReadFailed;
    }
    canvas.clear();
    if let Err(e) = canvas.copy(&texture, None, None) {
      warn!("预览渲染失败: {}", e);
      return CaptureOutcome::ReadFailed;
    }
    canvas.present();

    std::thread::sleep(POLL_INTERVAL);
  }
}
