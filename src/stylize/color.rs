// 该文件是 Huiying（绘影）项目的一部分。
// src/stylize/color.rs - 色彩调整（色温、饱和度、色相波、亮度对比度）
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

use image::{Rgb, RgbImage};

/// 色相波的振幅（H 通道单位，H ∈ [0, 180)）
const HUE_WAVE_AMPLITUDE: f32 = 30.0;
/// 色相波的空间频率
const HUE_WAVE_FREQUENCY: f32 = 0.01;

/// RGB 转 HSV
///
/// 采用 OpenCV 的 8 位约定：H ∈ [0, 180)，S、V ∈ [0, 255]。
pub(crate) fn rgb_to_hsv(pixel: Rgb<u8>) -> (f32, f32, f32) {
  let r = pixel.0[0] as f32;
  let g = pixel.0[1] as f32;
  let b = pixel.0[2] as f32;

  let max = r.max(g).max(b);
  let min = r.min(g).min(b);
  let delta = max - min;

  let v = max;
  let s = if max > 0.0 { delta / max * 255.0 } else { 0.0 };

  let h_deg = if delta == 0.0 {
    0.0
  } else if max == r {
    60.0 * (((g - b) / delta).rem_euclid(6.0))
  } else if max == g {
    60.0 * ((b - r) / delta + 2.0)
  } else {
    60.0 * ((r - g) / delta + 4.0)
  };

  (h_deg / 2.0, s, v)
}

/// HSV 转 RGB（H ∈ [0, 180)，S、V ∈ [0, 255]）
pub(crate) fn hsv_to_rgb(h: f32, s: f32, v: f32) -> Rgb<u8> {
  let h_deg = h.rem_euclid(180.0) * 2.0;
  let s = (s / 255.0).clamp(0.0, 1.0);
  let v = (v / 255.0).clamp(0.0, 1.0);

  let c = v * s;
  let x = c * (1.0 - ((h_deg / 60.0) % 2.0 - 1.0).abs());
  let m = v - c;

  let (r, g, b) = if h_deg < 60.0 {
    (c, x, 0.0)
  } else if h_deg < 120.0 {
    (x, c, 0.0)
  } else if h_deg < 180.0 {
    (0.0, c, x)
  } else if h_deg < 240.0 {
    (0.0, x, c)
  } else if h_deg < 300.0 {
    (x, 0.0, c)
  } else {
    (c, 0.0, x)
  };

  Rgb([
    ((r + m) * 255.0).round().clamp(0.0, 255.0) as u8,
    ((g + m) * 255.0).round().clamp(0.0, 255.0) as u8,
    ((b + m) * 255.0).round().clamp(0.0, 255.0) as u8,
  ])
}

/// 色温调整
///
/// factor > 1 时偏暖：红通道乘 factor，蓝通道乘 0.9；
/// factor < 1 时为镜像操作：蓝通道乘 (2 - factor)，红通道乘 factor。
pub fn adjust_color_temperature(image: &RgbImage, factor: f32) -> RgbImage {
  let (red_gain, blue_gain) = if factor > 1.0 {
    (factor, 0.9)
  } else {
    (factor, 2.0 - factor)
  };

  let mut output = image.clone();
  for pixel in output.pixels_mut() {
    pixel.0[0] = (pixel.0[0] as f32 * red_gain).clamp(0.0, 255.0) as u8;
    pixel.0[2] = (pixel.0[2] as f32 * blue_gain).clamp(0.0, 255.0) as u8;
  }
  output
}

/// 饱和度增强：HSV 空间内 S 通道乘以系数后截断
pub fn enhance_saturation(image: &RgbImage, factor: f32) -> RgbImage {
  let mut output = image.clone();
  for pixel in output.pixels_mut() {
    let (h, s, v) = rgb_to_hsv(*pixel);
    let s = (s * factor).clamp(0.0, 255.0);
    *pixel = hsv_to_rgb(h, s, v);
  }
  output
}

/// 色相波偏移（Paprika 风格的迷幻色彩）
///
/// 对 (i, j) 处像素施加 Δh = 30·sin(0.01·i)·cos(0.01·j)，
/// 色相按模 180 回绕。
pub fn shift_hue_wave(image: &RgbImage) -> RgbImage {
  let (width, height) = image.dimensions();
  let mut output = RgbImage::new(width, height);
  for i in 0..height {
    let row_wave = HUE_WAVE_AMPLITUDE * (i as f32 * HUE_WAVE_FREQUENCY).sin();
    for j in 0..width {
      let shift = row_wave * (j as f32 * HUE_WAVE_FREQUENCY).cos();
      let (h, s, v) = rgb_to_hsv(*image.get_pixel(j, i));
      let h = (h + shift).rem_euclid(180.0);
      output.put_pixel(j, i, hsv_to_rgb(h, s, v));
    }
  }
  output
}

/// 亮度与对比度调整：out = clip(contrast·in + brightness)
pub fn adjust_brightness_contrast(image: &RgbImage, contrast: f32, brightness: f32) -> RgbImage {
  let mut output = image.clone();
  for pixel in output.pixels_mut() {
    for c in 0..3 {
      pixel.0[c] = (pixel.0[c] as f32 * contrast + brightness)
        .round()
        .clamp(0.0, 255.0) as u8;
    }
  }
  output
}

/// 加权混合：out = α·a + β·b，逐像素截断到 [0, 255]
pub fn blend_weighted(a: &RgbImage, alpha: f32, b: &RgbImage, beta: f32) -> RgbImage {
  debug_assert_eq!(a.dimensions(), b.dimensions());
  let (width, height) = a.dimensions();
  let mut output = RgbImage::new(width, height);
  for ((pa, pb), out) in a.pixels().zip(b.pixels()).zip(output.pixels_mut()) {
    for c in 0..3 {
      out.0[c] = (pa.0[c] as f32 * alpha + pb.0[c] as f32 * beta)
        .round()
        .clamp(0.0, 255.0) as u8;
    }
  }
  output
}
