// 该文件是 Huiying（绘影）项目的一部分。
// src/stylize/bilateral.rs - 彩色双边滤波
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

use image::RgbImage;

/// 彩色双边滤波
///
/// 权重同时取决于空间距离与颜色距离，因此在抹平纹理的同时保留边缘。
/// `radius` 为窗口半径（直径 d = 2*radius + 1），边界按复制处理。
pub fn bilateral_filter(
  image: &RgbImage,
  radius: i32,
  sigma_color: f32,
  sigma_space: f32,
) -> RgbImage {
  let (width, height) = image.dimensions();
  let mut output = RgbImage::new(width, height);

  // 预计算空间高斯核
  let side = (2 * radius + 1) as usize;
  let space_coeff = -0.5 / (sigma_space * sigma_space);
  let color_coeff = -0.5 / (sigma_color * sigma_color);
  let mut space_kernel = vec![0.0f32; side * side];
  for dy in -radius..=radius {
    for dx in -radius..=radius {
      let idx = ((dy + radius) as usize) * side + (dx + radius) as usize;
      space_kernel[idx] = ((dy * dy + dx * dx) as f32 * space_coeff).exp();
    }
  }

  for y in 0..height as i32 {
    for x in 0..width as i32 {
      let center = image.get_pixel(x as u32, y as u32).0;
      let mut acc = [0.0f32; 3];
      let mut weight_sum = 0.0f32;

      for dy in -radius..=radius {
        for dx in -radius..=radius {
          let ny = (y + dy).clamp(0, height as i32 - 1) as u32;
          let nx = (x + dx).clamp(0, width as i32 - 1) as u32;
          let neighbor = image.get_pixel(nx, ny).0;

          let mut color_dist = 0.0f32;
          for c in 0..3 {
            let d = neighbor[c] as f32 - center[c] as f32;
            color_dist += d * d;
          }

          let idx = ((dy + radius) as usize) * side + (dx + radius) as usize;
          let weight = space_kernel[idx] * (color_dist * color_coeff).exp();

          for c in 0..3 {
            acc[c] += neighbor[c] as f32 * weight;
          }
          weight_sum += weight;
        }
      }

      let pixel = output.get_pixel_mut(x as u32, y as u32);
      for c in 0..3 {
        pixel.0[c] = (acc[c] / weight_sum).round().clamp(0.0, 255.0) as u8;
      }
    }
  }

  output
}

#[cfg(test)]
mod tests {
  use super::*;
  use image::Rgb;

  #[test]
  fn uniform_image_is_fixed_point() {
    let img = RgbImage::from_pixel(16, 16, Rgb([90, 120, 33]));
    let out = bilateral_filter(&img, 4, 200.0, 200.0);
    assert_eq!(out, img);
  }

  #[test]
  fn preserves_dimensions() {
    let img = RgbImage::from_fn(13, 7, |x, y| Rgb([(x * 19) as u8, (y * 31) as u8, 0]));
    let out = bilateral_filter(&img, 7, 200.0, 200.0);
    assert_eq!(out.dimensions(), (13, 7));
  }

  #[test]
  fn smooths_small_noise() {
    // 一个孤立的轻噪声点应被周围值拉平
    let mut img = RgbImage::from_pixel(9, 9, Rgb([100, 100, 100]));
    img.put_pixel(4, 4, Rgb([110, 110, 110]));
    let out = bilateral_filter(&img, 4, 200.0, 200.0);
    let center = out.get_pixel(4, 4).0;
    assert!(center[0] < 110);
  }
}
