// 该文件是 Huiying（绘影）项目的一部分。
// src/stylize/edges.rs - 亮度自适应二值化边缘图
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

use image::{GrayImage, RgbImage};

/// 邻域均值窗口边长
const BLOCK_SIZE: u32 = 9;
/// 均值减去的常数
const MEAN_OFFSET: f32 = 10.0;

/// 从原始（未平滑）帧提取白底黑线的边缘掩膜，复制为 3 通道
///
/// 做法是对亮度图做邻域均值自适应二值化：
/// 像素值大于（邻域均值 - 常数）者为白（背景），否则为黑（边缘）。
pub fn edge_mask(image: &RgbImage) -> RgbImage {
  let gray = luminance(image);
  let binary = adaptive_mean_threshold(&gray, BLOCK_SIZE, MEAN_OFFSET);

  let (width, height) = image.dimensions();
  let mut mask = RgbImage::new(width, height);
  for (src, dst) in binary.pixels().zip(mask.pixels_mut()) {
    let v = src.0[0];
    dst.0 = [v, v, v];
  }
  mask
}

/// 亮度转换（ITU-R BT.601 加权）
pub fn luminance(image: &RgbImage) -> GrayImage {
  let (width, height) = image.dimensions();
  let mut gray = GrayImage::new(width, height);
  for (src, dst) in image.pixels().zip(gray.pixels_mut()) {
    let [r, g, b] = src.0;
    let y = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
    dst.0 = [y.round().clamp(0.0, 255.0) as u8];
  }
  gray
}

/// 邻域均值自适应二值化
///
/// 块大小为 `block`（奇数），阈值为邻域均值减 `offset`。
/// 边界处窗口按图像范围裁剪，均值按实际覆盖面积计算。
pub fn adaptive_mean_threshold(gray: &GrayImage, block: u32, offset: f32) -> GrayImage {
  let (width, height) = gray.dimensions();
  let w = width as usize;
  let h = height as usize;
  let radius = (block / 2) as i64;

  // 积分图：integral[(y+1)*(w+1)+(x+1)] = sum(gray[0..=y][0..=x])
  let mut integral = vec![0u64; (w + 1) * (h + 1)];
  for y in 0..h {
    let mut row_sum = 0u64;
    for x in 0..w {
      row_sum += gray.get_pixel(x as u32, y as u32).0[0] as u64;
      integral[(y + 1) * (w + 1) + (x + 1)] = integral[y * (w + 1) + (x + 1)] + row_sum;
    }
  }

  let mut output = GrayImage::new(width, height);
  for y in 0..h as i64 {
    for x in 0..w as i64 {
      let x0 = (x - radius).max(0) as usize;
      let y0 = (y - radius).max(0) as usize;
      let x1 = (x + radius).min(w as i64 - 1) as usize;
      let y1 = (y + radius).min(h as i64 - 1) as usize;

      let area = ((x1 - x0 + 1) * (y1 - y0 + 1)) as f32;
      let sum = integral[(y1 + 1) * (w + 1) + (x1 + 1)] + integral[y0 * (w + 1) + x0]
        - integral[y0 * (w + 1) + (x1 + 1)]
        - integral[(y1 + 1) * (w + 1) + x0];
      let mean = sum as f32 / area;

      let value = gray.get_pixel(x as u32, y as u32).0[0] as f32;
      let out = if value > mean - offset { 255 } else { 0 };
      output.get_pixel_mut(x as u32, y as u32).0 = [out];
    }
  }

  output
}
