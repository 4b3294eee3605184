use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::ValueEnum;
use image::{ImageFormat, Rgb, RgbImage};
use serde::Deserialize;

use crate::font::CardFont;
use crate::score::{Grade, Score};
use crate::stats::StatsRecord;

pub const WIDTH: u32 = 820;
pub const HEIGHT: u32 = 200;

const PADDING: i32 = 28;
const LEFT_WIDTH: i32 = 520;
const TITLE_Y: i32 = 18;
const ROWS_Y: i32 = 56;
const ROW_HEIGHT: i32 = 34;
const VALUE_OFFSET: i32 = 180;
const FOOTER_OFFSET: i32 = 26;

const RING_CENTER: (i32, i32) = (LEFT_WIDTH + 180, HEIGHT as i32 / 2);
const RING_RADIUS: i32 = 64;
const RING_THICKNESS: i32 = 12;
const CAPTION_OFFSET: i32 = 34;

const TITLE_SIZE: f32 = 20.0;
const BIG_SIZE: f32 = 36.0;
const MEDIUM_SIZE: f32 = 18.0;
const SMALL_SIZE: f32 = 14.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

pub struct Palette {
    pub bg: Rgb<u8>,
    pub accent: Rgb<u8>,
    pub text: Rgb<u8>,
    pub muted: Rgb<u8>,
    pub label: Rgb<u8>,
    pub track: Rgb<u8>,
}

impl Theme {
    pub fn palette(self) -> Palette {
        match self {
            Theme::Dark => Palette {
                bg: Rgb([34, 26, 53]),
                accent: Rgb([233, 87, 143]),
                text: Rgb([220, 220, 230]),
                muted: Rgb([170, 170, 170]),
                label: Rgb([255, 180, 210]),
                track: Rgb([60, 60, 80]),
            },
            Theme::Light => Palette {
                bg: Rgb([255, 255, 255]),
                accent: Rgb([215, 58, 73]),
                text: Rgb([36, 41, 47]),
                muted: Rgb([106, 115, 125]),
                label: Rgb([3, 102, 214]),
                track: Rgb([225, 228, 232]),
            },
        }
    }
}

/// Everything drawn on one card.
pub struct Card<'a> {
    pub user: &'a str,
    pub stats: &'a StatsRecord,
    pub score: Score,
    pub grade: Grade,
    pub generated_on: NaiveDate,
}

/// Degrees of the ring covered by `score`, truncated.
pub fn arc_sweep_degrees(score: Score) -> u32 {
    (360.0 * score.fraction()) as u32
}

/// Draw the ring: full track first, then the filled arc clockwise from
/// 12 o'clock. Thickness grows inward from the outer radius.
fn draw_ring(image: &mut RgbImage, score: Score, palette: &Palette) {
    let (cx, cy) = RING_CENTER;
    let outer = f64::from(RING_RADIUS);
    let inner = f64::from(RING_RADIUS - RING_THICKNESS);
    let sweep = f64::from(arc_sweep_degrees(score));

    for y in (cy - RING_RADIUS)..=(cy + RING_RADIUS) {
        for x in (cx - RING_RADIUS)..=(cx + RING_RADIUS) {
            if x < 0 || y < 0 || x >= WIDTH as i32 || y >= HEIGHT as i32 {
                continue;
            }

            let dx = f64::from(x - cx);
            let dy = f64::from(y - cy);
            let dist = dx.hypot(dy);
            if dist > outer || dist <= inner {
                continue;
            }

            // y grows downward, so atan2 already runs clockwise.
            let from_top = (dy.atan2(dx).to_degrees() + 90.0).rem_euclid(360.0);
            let color = if from_top < sweep {
                palette.accent
            } else {
                palette.track
            };
            image.put_pixel(x as u32, y as u32, color);
        }
    }
}

fn draw_centered(
    image: &mut RgbImage,
    font: &CardFont,
    color: Rgb<u8>,
    center_x: i32,
    y: i32,
    size: f32,
    text: &str,
) {
    let (w, _) = font.measure(size, text);
    font.draw(image, color, center_x - w as i32 / 2, y, size, text);
}

/// Lay the card out on a fresh 820x200 canvas.
pub fn draw_card(card: &Card<'_>, theme: Theme, font: &CardFont) -> RgbImage {
    let palette = theme.palette();
    let mut image = RgbImage::from_pixel(WIDTH, HEIGHT, palette.bg);

    let title = format!("{}'s GitHub Stats", card.user);
    font.draw(&mut image, palette.text, PADDING, TITLE_Y, TITLE_SIZE, &title);

    let mut y = ROWS_Y;
    for (label, value) in card.stats.card_rows() {
        font.draw(&mut image, palette.label, PADDING, y, MEDIUM_SIZE, label);
        font.draw(
            &mut image,
            palette.text,
            PADDING + VALUE_OFFSET,
            y,
            BIG_SIZE,
            &value.to_string(),
        );
        y += ROW_HEIGHT;
    }

    draw_ring(&mut image, card.score, &palette);

    let (cx, cy) = RING_CENTER;
    let grade = card.grade.label();
    let (_, grade_h) = font.measure(BIG_SIZE, grade);
    draw_centered(
        &mut image,
        font,
        palette.text,
        cx,
        cy - grade_h as i32 / 2,
        BIG_SIZE,
        grade,
    );

    let pct = format!("{}%", card.score);
    draw_centered(
        &mut image,
        font,
        palette.muted,
        cx,
        cy + CAPTION_OFFSET,
        SMALL_SIZE,
        &pct,
    );

    let footer = format!(
        "Generated for {} on {}",
        card.user,
        card.generated_on.format("%Y-%m-%d")
    );
    font.draw(
        &mut image,
        palette.muted,
        PADDING,
        HEIGHT as i32 - FOOTER_OFFSET,
        SMALL_SIZE,
        &footer,
    );

    image
}

/// Write `image` as PNG, creating parent directories as needed.
pub fn save_card(image: &RgbImage, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    image
        .save_with_format(path, ImageFormat::Png)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
