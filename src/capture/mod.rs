// 该文件是 Huiying（绘影）项目的一部分。
// src/capture/mod.rs - 捕获编排（倒计时、预览、降级）
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

#[cfg(feature = "preview_overlay")]
pub mod overlay;
#[cfg(all(feature = "windowed", feature = "v4l2_camera"))]
mod windowed;

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

use crate::input::Frame;
use crate::preset::Preset;

/// 捕获模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptureMode {
  /// 无预览窗口，服务端调用的默认模式
  #[default]
  Headless,
  /// 本地桌面使用：带预览窗口与键盘交互
  Windowed,
}

impl FromStr for CaptureMode {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_lowercase().as_str() {
      "headless" => Ok(CaptureMode::Headless),
      "windowed" => Ok(CaptureMode::Windowed),
      other => Err(format!("unknown capture mode '{}'", other)),
    }
  }
}

/// 捕获会话的终态
pub enum CaptureOutcome {
  /// 成功捕获一帧（帧已复制到自有缓冲）
  Captured(Frame),
  /// 用户取消
  Cancelled,
  /// 没有可用的摄像头后端
  BackendFailed,
  /// 已打开的后端在会话中途读取失败
  ReadFailed,
}

/// 无头模式默认倒计时
pub const DEFAULT_HEADLESS_COUNTDOWN: Duration = Duration::from_secs(3);
/// 窗口模式默认倒计时
pub const DEFAULT_WINDOWED_COUNTDOWN: Duration = Duration::from_secs(5);

/// 捕获会话
///
/// 每次请求创建一个会话；会话在有界时间内终止，
/// 摄像头句柄由会话独占并在所有退出路径上释放。
pub struct CaptureSession {
  preset: Preset,
  mode: CaptureMode,
  countdown: Duration,
  devices: Vec<PathBuf>,
}

impl CaptureSession {
  /// 创建捕获会话，倒计时按模式取默认值
  pub fn new(preset: Preset, mode: CaptureMode) -> Self {
    let countdown = match mode {
      CaptureMode::Headless => DEFAULT_HEADLESS_COUNTDOWN,
      CaptureMode::Windowed => DEFAULT_WINDOWED_COUNTDOWN,
    };
    let devices = default_devices();
    Self {
      preset,
      mode,
      countdown,
      devices,
    }
  }

  /// 覆盖倒计时时长
  pub fn with_countdown(mut self, countdown: Duration) -> Self {
    self.countdown = countdown;
    self
  }

  /// 覆盖设备候选列表
  pub fn with_devices(mut self, devices: Vec<PathBuf>) -> Self {
    self.devices = devices;
    self
  }

  /// 预设
  pub fn preset(&self) -> Preset {
    self.preset
  }

  /// 倒计时时长
  pub fn countdown(&self) -> Duration {
    self.countdown
  }

  /// 运行会话直到终态
  ///
  /// 摄像头探测失败归约为 `BackendFailed`；窗口模式在没有
  /// 显示表面（或未编译窗口支持）时保守地退回无头流程。
  pub fn run(&self) -> CaptureOutcome {
    #[cfg(not(feature = "v4l2_camera"))]
    {
      warn!("未编译摄像头支持（v4l2_camera 特性未启用）");
      CaptureOutcome::BackendFailed
    }

    #[cfg(feature = "v4l2_camera")]
    {
      use crate::input::CameraSource;

      let Some(source) = CameraSource::probe(&self.devices) else {
        return CaptureOutcome::BackendFailed;
      };

      match self.mode {
        CaptureMode::Headless => self.run_headless(source),
        CaptureMode::Windowed => {
          #[cfg(feature = "windowed")]
          {
            if display_available() {
              return windowed::run_windowed(self, source);
            }
            warn!("未检测到显示表面，退回无头捕获");
            self.run_headless(source)
          }
          #[cfg(not(feature = "windowed"))]
          {
            warn!("未编译窗口支持（windowed 特性未启用），退回无头捕获");
            self.run_headless(source)
          }
        }
      }
    }
  }

  /// 无头捕获：文本进度 + 倒计时，随后取下一帧
  #[cfg(feature = "v4l2_camera")]
  fn run_headless(&self, mut source: crate::input::CameraSource) -> CaptureOutcome {
    info!(
      "开始 {} 风格的无头捕获，{} 秒后拍摄",
      self.preset,
      self.countdown.as_secs()
    );

    for remaining in (1..=self.countdown.as_secs()).rev() {
      info!("{} 秒后拍摄...", remaining);
      // 每秒读掉一帧，保持缓冲内容新鲜
      match source.next() {
        Some(Ok(_)) => {}
        _ => return CaptureOutcome::ReadFailed,
      }
      std::thread::sleep(Duration::from_secs(1));
    }

    info!("拍摄中...");
    match source.next() {
      Some(Ok(frame)) => {
        info!("拍摄成功（帧 {}）", frame.index);
        CaptureOutcome::Captured(frame)
      }
      _ => CaptureOutcome::ReadFailed,
    }
    // source 在此处析构，设备随之释放
  }
}

/// 默认设备候选列表
fn default_devices() -> Vec<PathBuf> {
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

/// 保守的显示表面检测：只有确认存在显示时才允许窗口模式
pub fn display_available() -> bool {
  std::env::var_os("DISPLAY")
    .or_else(|| std::env::var_os("WAYLAND_DISPLAY"))
    .is_some_and(|v| !v.is_empty())
}
