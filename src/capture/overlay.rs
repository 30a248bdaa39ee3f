// 该文件是 Huiying（绘影）项目的一部分。
// src/capture/overlay.rs - 预览叠加层（横幅、倒计时与操作提示）
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

use ab_glyph::{FontArc, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_text_mut};
use imageproc::rect::Rect;
use tracing::warn;

use crate::preset::Preset;

/// 横幅高度
const BANNER_HEIGHT: u32 = 120;

/// 常见系统字体路径，按顺序尝试
const FONT_CANDIDATES: &[&str] = &[
  "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
  "/usr/share/fonts/TTF/DejaVuSans.ttf",
  "/usr/share/fonts/dejavu/DejaVuSans.ttf",
  "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
];

/// 预览叠加层
///
/// 在实时帧上绘制黑色横幅、风格信息、倒计时与按键提示，
/// 以及一条不依赖字体的倒计时进度条。
/// 找不到可用字体时文字缺省，进度条仍然可见，不视为错误。
pub struct PreviewOverlay {
  /// 字体（系统字体缺失时为 None）
  font: Option<FontArc>,
  /// 字体大小
  scale: PxScale,
}

impl Default for PreviewOverlay {
  fn default() -> Self {
    Self::new()
  }
}

impl PreviewOverlay {
  /// 创建叠加层，尝试加载系统字体
  pub fn new() -> Self {
    let font = FONT_CANDIDATES.iter().find_map(|path| {
      let data = std::fs::read(path).ok()?;
      FontArc::try_from_vec(data).ok()
    });
    if font.is_none() {
      warn!("未找到可用的系统字体，预览叠加层将只绘制横幅");
    }

    Self {
      font,
      scale: PxScale::from(18.0),
    }
  }

  /// 在帧副本上绘制叠加层
  pub fn compose(
    &self,
    frame: &RgbImage,
    preset: Preset,
    remaining_secs: u64,
    total_secs: u64,
  ) -> RgbImage {
    let mut preview = frame.clone();
    let (width, height) = preview.dimensions();
    let banner_height = BANNER_HEIGHT.min(height);

    draw_filled_rect_mut(
      &mut preview,
      Rect::at(0, 0).of_size(width, banner_height),
      Rgb([0, 0, 0]),
    );

    // 倒计时进度条：没有字体时也要能看出剩余时间
    const BAR_HEIGHT: u32 = 6;
    const BAR_MARGIN: u32 = 10;
    if total_secs > 0 && width > 2 * BAR_MARGIN && banner_height >= BAR_HEIGHT + 2 {
      let bar_y = (banner_height - BAR_HEIGHT - 2) as i32;
      let track_width = width - 2 * BAR_MARGIN;
      draw_filled_rect_mut(
        &mut preview,
        Rect::at(BAR_MARGIN as i32, bar_y).of_size(track_width, BAR_HEIGHT),
        Rgb([60, 60, 60]),
      );
      let filled = (track_width as u64 * remaining_secs.min(total_secs) / total_secs) as u32;
      if filled > 0 {
        draw_filled_rect_mut(
          &mut preview,
          Rect::at(BAR_MARGIN as i32, bar_y).of_size(filled, BAR_HEIGHT),
          Rgb([0, 255, 0]),
        );
      }
    }

    if let Some(font) = &self.font {
      let countdown_line = if remaining_secs > 0 {
        format!("Capture in: {}s", remaining_secs)
      } else {
        "Auto-capturing...".to_string()
      };

      let lines: [(&str, Rgb<u8>); 4] = [
        (preset.display_name(), Rgb([255, 255, 0])),
        (preset.description(), Rgb([255, 255, 255])),
        (&countdown_line, Rgb([0, 255, 0])),
        ("SPACE: capture now    ESC: cancel", Rgb([0, 255, 255])),
      ];

      for (row, (text, color)) in lines.into_iter().enumerate() {
        draw_text_mut(
          &mut preview,
          color,
          10,
          8 + row as i32 * 26,
          self.scale,
          font,
          text,
        );
      }
    }

    preview
  }
}
