// 该文件是 Huiying（绘影）项目的一部分。
// src/stylize/mod.rs - 动漫风格化管线
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

mod bilateral;
mod color;
mod edges;
mod quantize;

use image::RgbImage;
use rand::SeedableRng;
use rand::rngs::StdRng;
use thiserror::Error;
use tracing::info;

use crate::preset::Preset;

pub use bilateral::bilateral_filter;
pub use color::{
  adjust_brightness_contrast, adjust_color_temperature, blend_weighted, enhance_saturation,
  shift_hue_wave,
};
pub use edges::{adaptive_mean_threshold, edge_mask, luminance};
pub use quantize::reduce_palette;

/// 风格化错误
#[derive(Error, Debug)]
pub enum StylizeError {
  #[error("输入帧为空（{width}x{height}）")]
  EmptyFrame { width: u32, height: u32 },
}

/// 动漫风格化器
///
/// 对单帧图像施加选定预设的确定性变换
/// （除 K-means 初始中心外，固定种子时逐点可复现）。
pub struct Stylizer {
  preset: Preset,
  seed: Option<u64>,
}

impl Stylizer {
  /// 创建指定预设的风格化器
  pub fn new(preset: Preset) -> Self {
    Self { preset, seed: None }
  }

  /// 固定 K-means 随机种子，使输出可复现
  pub fn with_seed(mut self, seed: u64) -> Self {
    self.seed = Some(seed);
    self
  }

  /// 预设
  pub fn preset(&self) -> Preset {
    self.preset
  }

  /// 应用风格化管线
  ///
  /// 输出与输入同尺寸。公共前段为两次双边平滑、调色板缩减与
  /// 边缘图提取；风格尾段按预设参数做色温 / 饱和度 / 色相波
  /// 调整与边缘叠加；公共后段为再一次双边平滑与亮度对比度调整。
  pub fn apply(&self, image: &RgbImage) -> Result<RgbImage, StylizeError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
      return Err(StylizeError::EmptyFrame { width, height });
    }

    info!("应用 {} 风格化管线 ({}x{})", self.preset, width, height);
    let started = std::time::Instant::now();

    let mut rng = match self.seed {
      Some(seed) => StdRng::seed_from_u64(seed),
      None => StdRng::from_entropy(),
    };

    // 第一步：两次边缘保持平滑，抹平纹理
    let smoothed = bilateral_filter(image, 7, 200.0, 200.0);
    let smoothed = bilateral_filter(&smoothed, 7, 200.0, 200.0);

    // 第二步：调色板缩减（动漫式的大块色面）
    let k = self.preset.palette_size();
    let mut anime = reduce_palette(&smoothed, k, &mut rng);

    // 第三步：从未平滑的原始帧提取边缘图
    let edges = edge_mask(image);

    // 第四步：风格尾段
    match self.preset {
      Preset::Hayao => {
        anime = adjust_color_temperature(&anime, self.preset.color_temperature());
      }
      Preset::Shinkai => {
        anime = enhance_saturation(&anime, self.preset.saturation());
      }
      Preset::Paprika => {
        // 先色相波，后饱和度增强
        anime = shift_hue_wave(&anime);
        anime = enhance_saturation(&anime, self.preset.saturation());
      }
    }

    // 边缘叠加
    let (alpha, beta) = self.preset.blend_weights();
    anime = blend_weighted(&anime, alpha, &edges, beta);

    // 第五步：最终平滑
    anime = bilateral_filter(&anime, 4, 300.0, 300.0);

    // 第六步：亮度与对比度
    anime = adjust_brightness_contrast(&anime, 1.1, 10.0);

    info!(
      "{} 风格化完成，耗时: {:.2?}",
      self.preset,
      started.elapsed()
    );

    Ok(anime)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use image::Rgb;

  fn synthetic_image() -> RgbImage {
    RgbImage::from_fn(48, 36, |x, y| {
      Rgb([(x * 5) as u8, (y * 7) as u8, ((x + y) * 3 % 256) as u8])
    })
  }

  #[test]
  fn shape_preserved_for_every_preset() {
    let img = synthetic_image();
    for preset in Preset::ALL {
      let out = Stylizer::new(preset).with_seed(3).apply(&img).unwrap();
      assert_eq!(out.dimensions(), img.dimensions());
    }
  }

  #[test]
  fn seeded_output_is_reproducible() {
    let img = synthetic_image();
    for preset in Preset::ALL {
      let a = Stylizer::new(preset).with_seed(42).apply(&img).unwrap();
      let b = Stylizer::new(preset).with_seed(42).apply(&img).unwrap();
      assert_eq!(a, b);
    }
  }

  #[test]
  fn hayao_warm_shift_on_gray() {
    // 均匀灰输入：Hayao 预设的暖色温应使红均值高于蓝均值
    let img = RgbImage::from_pixel(48, 36, Rgb([128, 128, 128]));
    let out = Stylizer::new(Preset::Hayao).with_seed(1).apply(&img).unwrap();
    let (mut red, mut blue) = (0u64, 0u64);
    for p in out.pixels() {
      red += p.0[0] as u64;
      blue += p.0[2] as u64;
    }
    assert!(red > blue);
  }

  #[test]
  fn paprika_introduces_hue_variation() {
    // 均匀饱和绿输入：色相波应让输出出现多个不同色相
    let img = RgbImage::from_pixel(64, 64, Rgb([10, 200, 50]));
    let out = Stylizer::new(Preset::Paprika)
      .with_seed(5)
      .apply(&img)
      .unwrap();
    let hues: std::collections::HashSet<u16> = out
      .pixels()
      .map(|p| {
        let (h, _, _) = super::color::rgb_to_hsv(*p);
        h.round() as u16
      })
      .collect();
    assert!(hues.len() > 1);
  }

  #[test]
  fn tiny_frames_are_total() {
    let img = RgbImage::from_pixel(1, 1, Rgb([200, 10, 10]));
    for preset in Preset::ALL {
      let out = Stylizer::new(preset).with_seed(9).apply(&img).unwrap();
      assert_eq!(out.dimensions(), (1, 1));
    }
  }

  #[test]
  fn empty_frame_is_rejected() {
    let img = RgbImage::new(0, 0);
    let err = Stylizer::new(Preset::Hayao).apply(&img).unwrap_err();
    assert!(matches!(err, StylizeError::EmptyFrame { .. }));
  }
}
