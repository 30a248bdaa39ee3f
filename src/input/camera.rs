// 该文件是 Huiying（绘影）项目的一部分。
// src/input/camera.rs - V4L2 摄像头帧来源（带探测与预热）
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

use anyhow::Result;
use image::RgbImage;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::thread::sleep;
use std::time::{Duration, Instant};
use tracing::{info, warn};
use v4l::FourCC;
use v4l::buffer::Type;
use v4l::io::mmap::Stream;
use v4l::io::traits::CaptureStream;
use v4l::prelude::*;
use v4l::video::Capture;
use v4l::video::capture::Parameters;

use super::{Frame, FrameSource, InputError, SourceKind};

/// 默认的设备探测顺序
pub const DEFAULT_DEVICE_CANDIDATES: &[&str] = &["/dev/video0", "/dev/video1"];

/// 期望的采集宽度
const CAPTURE_WIDTH: u32 = 640;
/// 期望的采集高度
const CAPTURE_HEIGHT: u32 = 480;
/// 期望的帧率（较低的帧率更稳定）
const CAPTURE_FPS: u32 = 15;
/// 预热时丢弃的帧数
const WARM_UP_FRAMES: usize = 3;
/// 预热帧之间的间隔
const WARM_UP_INTERVAL: Duration = Duration::from_millis(100);

/// V4L2 摄像头帧来源
///
/// 由于 v4l 库的 Stream 需要引用 Device，我们使用 Pin<Box> 来保证
/// Device 的内存地址稳定，从而可以安全地创建引用它的 Stream。
pub struct CameraSource {
  /// V4L2 设备（使用 Pin<Box> 固定内存位置）
  device: Pin<Box<Device>>,
  /// 捕获流（生命周期与 device 关联）
  stream: Option<Stream<'static>>,
  /// 帧索引
  frame_index: u64,
  /// 协商后的帧宽度
  width: u32,
  /// 协商后的帧高度
  height: u32,
  /// 开始时间
  start_time: Instant,
}

impl CameraSource {
  /// 按顺序探测候选设备，返回第一个能打开并产出探测帧的来源
  ///
  /// 权限不足、被其它进程独占、设备不存在等失败一律归约为 None，
  /// 调用方应将 None 视为可恢复情况并走降级路径。
  pub fn probe(candidates: &[PathBuf]) -> Option<CameraSource> {
    for candidate in candidates {
      info!("探测摄像头设备: {}", candidate.display());
      match Self::open_device(candidate) {
        Ok(mut source) => match source.warm_up() {
          Ok(()) => {
            info!(
              "摄像头就绪: {} ({}x{})",
              candidate.display(),
              source.width,
              source.height
            );
            return Some(source);
          }
          Err(e) => {
            warn!("设备 {} 预热失败: {}", candidate.display(), e);
          }
        },
        Err(e) => {
          warn!("设备 {} 探测失败: {}", candidate.display(), e);
        }
      }
    }

    warn!("所有候选设备均不可用");
    None
  }

  /// 打开单个设备并读取一帧探测帧
  fn open_device(path: &Path) -> Result<CameraSource, InputError> {
    let device = Box::pin(Device::with_path(path)?);

    // 协商采集格式：640x480 YUYV
    let mut format = device.format()?;
    format.width = CAPTURE_WIDTH;
    format.height = CAPTURE_HEIGHT;
    format.fourcc = FourCC::new(b"YUYV");
    let format = device.set_format(&format)?;

    if format.fourcc != FourCC::new(b"YUYV") {
      return Err(InputError::FrameRead(format!(
        "设备不支持 YUYV 格式（实际为 {}）",
        format.fourcc
      )));
    }

    // 帧率属性为尽力而为：设置失败仅记录，不视为致命
    if let Err(e) = device.set_params(&Parameters::with_fps(CAPTURE_FPS)) {
      warn!("无法设置帧率为 {}: {}", CAPTURE_FPS, e);
    }

    let width = format.width;
    let height = format.height;

    let mut source = Self {
      device,
      stream: None,
      frame_index: 0,
      width,
      height,
      start_time: Instant::now(),
    };

    // 创建捕获流（单缓冲，减少滞留帧）
    // SAFETY: device 被 Pin<Box> 固定，不会移动，所以引用始终有效。
    // Stream 存储在同一个结构体中，Drop 顺序为 stream (Option::take) -> device。
    let device_ref: &Device = &source.device;
    let stream = unsafe {
      let device_static: &'static Device = std::mem::transmute(device_ref);
      Stream::with_buffers(device_static, Type::VideoCapture, 1)?
    };
    source.stream = Some(stream);

    // 探测门槛：只有能实际读出非空帧的设备才被接受
    let probe = source.read_raw()?;
    if probe.is_empty() {
      return Err(InputError::FrameRead("探测帧为空".to_string()));
    }

    Ok(source)
  }

  /// 预热：丢弃前几帧，等待曝光与白平衡稳定
  fn warm_up(&mut self) -> Result<(), InputError> {
    info!("摄像头预热中...");
    for _ in 0..WARM_UP_FRAMES {
      self.read_raw()?;
      sleep(WARM_UP_INTERVAL);
    }
    Ok(())
  }

  /// 读取一帧原始 YUYV 数据
  fn read_raw(&mut self) -> Result<Vec<u8>, InputError> {
    let stream = self
      .stream
      .as_mut()
      .ok_or_else(|| InputError::FrameRead("捕获流已关闭".to_string()))?;
    let (buffer, _meta) = stream
      .next()
      .map_err(|e| InputError::FrameRead(e.to_string()))?;
    Ok(buffer.to_vec())
  }

  /// 将 YUYV 格式转换为 RGB
  fn yuyv_to_rgb(yuyv: &[u8], width: u32, height: u32) -> Vec<u8> {
    fn to_rgb(y: f32, u: f32, v: f32) -> [u8; 3] {
      [
        (y + 1.402 * v).clamp(0.0, 255.0) as u8,
        (y - 0.344 * u - 0.714 * v).clamp(0.0, 255.0) as u8,
        (y + 1.772 * u).clamp(0.0, 255.0) as u8,
      ]
    }

    let mut rgb = Vec::with_capacity((width * height * 3) as usize);
    for chunk in yuyv.chunks_exact(4) {
      let y0 = chunk[0] as f32;
      let u = chunk[1] as f32 - 128.0;
      let y1 = chunk[2] as f32;
      let v = chunk[3] as f32 - 128.0;

      rgb.extend_from_slice(&to_rgb(y0, u, v));
      rgb.extend_from_slice(&to_rgb(y1, u, v));
    }

    rgb
  }
}

impl Drop for CameraSource {
  fn drop(&mut self) {
    // 确保 stream 在 device 之前被 drop，从而释放设备
    self.stream.take();
  }
}

impl Iterator for CameraSource {
  type Item = Result<Frame>;

  fn next(&mut self) -> Option<Self::Item> {
    let yuyv = match self.read_raw() {
      Ok(data) => data,
      Err(e) => return Some(Err(e.into())),
    };

    let rgb_data = Self::yuyv_to_rgb(&yuyv, self.width, self.height);
    let image = match RgbImage::from_raw(self.width, self.height, rgb_data) {
      Some(img) => img,
      None => {
        return Some(Err(
          InputError::FrameRead("无法从原始数据创建 RGB 图像".to_string()).into(),
        ));
      }
    };

    let frame = Frame {
      image,
      index: self.frame_index,
      timestamp_ms: self.start_time.elapsed().as_millis() as u64,
    };

    self.frame_index += 1;
    Some(Ok(frame))
  }
}

impl FrameSource for CameraSource {
  fn kind(&self) -> SourceKind {
    SourceKind::Camera
  }

  fn width(&self) -> u32 {
    self.width
  }

  fn height(&self) -> u32 {
    self.height
  }

  fn fps(&self) -> Option<f64> {
    Some(CAPTURE_FPS as f64)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn probe_nonexistent_devices_returns_none() {
    let candidates = vec![
      PathBuf::from("/dev/video-does-not-exist-0"),
      PathBuf::from("/dev/video-does-not-exist-1"),
    ];
    assert!(CameraSource::probe(&candidates).is_none());
  }

  #[test]
  fn yuyv_conversion_produces_full_frame() {
    // 2x1 像素的中性灰 YUYV
    let yuyv = [128u8, 128, 128, 128];
    let rgb = CameraSource::yuyv_to_rgb(&yuyv, 2, 1);
    assert_eq!(rgb.len(), 6);
    // U=V=128 时应得到接近 Y 的灰度值
    for v in rgb {
      assert!((v as i32 - 128).abs() <= 2);
    }
  }
}
