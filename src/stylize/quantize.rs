// 该文件是 Huiying（绘影）项目的一部分。
// src/stylize/quantize.rs - K-means 调色板缩减
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
use rand::Rng;
use rand::rngs::StdRng;

/// K-means 最大迭代次数
const MAX_ITERATIONS: u32 = 20;
/// 收敛阈值：所有聚类中心移动量均小于该值时停止
const EPSILON: f32 = 1.0;

/// 将图像调色板缩减为 k 种代表色
///
/// 在 RGB 空间对全部像素做 K-means 聚类（随机初始中心），
/// 然后把每个像素替换为其所属聚类的中心色。
/// 输出图像的不同颜色数不超过 k。
pub fn reduce_palette(image: &RgbImage, k: usize, rng: &mut StdRng) -> RgbImage {
  let pixels: Vec<[f32; 3]> = image
    .pixels()
    .map(|p| [p.0[0] as f32, p.0[1] as f32, p.0[2] as f32])
    .collect();

  if pixels.is_empty() {
    return image.clone();
  }

  // 随机选取 k 个像素作为初始中心
  let mut centers: Vec<[f32; 3]> = (0..k)
    .map(|_| pixels[rng.gen_range(0..pixels.len())])
    .collect();

  let mut labels = vec![0usize; pixels.len()];

  for _ in 0..MAX_ITERATIONS {
    // 分配：每个像素归入最近的中心
    for (i, px) in pixels.iter().enumerate() {
      labels[i] = nearest_center(px, &centers);
    }

    // 更新：重算各聚类的均值
    let mut sums = vec![[0.0f32; 3]; k];
    let mut counts = vec![0usize; k];
    for (px, &label) in pixels.iter().zip(labels.iter()) {
      for c in 0..3 {
        sums[label][c] += px[c];
      }
      counts[label] += 1;
    }

    let mut max_shift = 0.0f32;
    for (j, center) in centers.iter_mut().enumerate() {
      if counts[j] == 0 {
        // 空聚类：重新随机落点
        *center = pixels[rng.gen_range(0..pixels.len())];
        max_shift = f32::MAX;
        continue;
      }
      let mut shift = 0.0f32;
      for c in 0..3 {
        let new = sums[j][c] / counts[j] as f32;
        let d = new - center[c];
        shift += d * d;
        center[c] = new;
      }
      max_shift = max_shift.max(shift.sqrt());
    }

    if max_shift < EPSILON {
      break;
    }
  }

  // 最终分配一次，保证像素与收敛后的中心一致
  let (width, height) = image.dimensions();
  let mut output = RgbImage::new(width, height);
  for (px, out) in pixels.iter().zip(output.pixels_mut()) {
    let center = centers[nearest_center(px, &centers)];
    out.0 = [
      center[0].round().clamp(0.0, 255.0) as u8,
      center[1].round().clamp(0.0, 255.0) as u8,
      center[2].round().clamp(0.0, 255.0) as u8,
    ];
  }

  output
}

/// 返回与给定像素距离最近的中心下标
fn nearest_center(px: &[f32; 3], centers: &[[f32; 3]]) -> usize {
  let mut best = 0;
  let mut best_dist = f32::MAX;
  for (j, center) in centers.iter().enumerate() {
    let mut dist = 0.0f32;
    for c in 0..3 {
      let d = px[c] - center[c];
      dist += d * d;
    }
    if dist < best_dist {
      best_dist = dist;
      best = j;
    }
  }
  best
}

#[cfg(test)]
mod tests {
  use super::*;
  use image::Rgb;
  use rand::SeedableRng;
  use std::collections::HashSet;

  fn distinct_colors(image: &RgbImage) -> usize {
    image.pixels().map(|p| p.0).collect::<HashSet<_>>().len()
  }

  #[test]
  fn palette_bound_holds() {
    let img = RgbImage::from_fn(64, 48, |x, y| {
      Rgb([(x * 4) as u8, (y * 5) as u8, ((x + y) * 2) as u8])
    });
    let mut rng = StdRng::seed_from_u64(7);
    let out = reduce_palette(&img, 8, &mut rng);
    assert!(distinct_colors(&out) <= 8);

    let mut rng = StdRng::seed_from_u64(7);
    let out = reduce_palette(&img, 12, &mut rng);
    assert!(distinct_colors(&out) <= 12);
  }

  #[test]
  fn uniform_image_stays_uniform() {
    let img = RgbImage::from_pixel(32, 32, Rgb([150, 100, 50]));
    let mut rng = StdRng::seed_from_u64(1);
    let out = reduce_palette(&img, 8, &mut rng);
    assert_eq!(distinct_colors(&out), 1);
    assert_eq!(out.get_pixel(0, 0).0, [150, 100, 50]);
  }

  #[test]
  fn seeded_runs_are_reproducible() {
    let img = RgbImage::from_fn(40, 30, |x, y| {
      Rgb([(x * 6) as u8, (y * 7) as u8, (x * y % 251) as u8])
    });
    let mut rng_a = StdRng::seed_from_u64(42);
    let mut rng_b = StdRng::seed_from_u64(42);
    assert_eq!(
      reduce_palette(&img, 8, &mut rng_a),
      reduce_palette(&img, 8, &mut rng_b)
    );
  }
}
