//! Text-mode chart backend: implements the core chart traits so the
//! lifecycle can drive a terminal rendering instead of a browser canvas.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use pair_charts_core::candle::CandlePoint;
use pair_charts_core::chart::{
    CandleSeriesOptions, ChartFactory, ChartHandle, ChartOptions, ChartSurface, CrosshairOptions,
    PriceScaleOptions, TimeScaleOptions, WatermarkOptions,
};
use pair_charts_core::error::ChartError;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// A terminal "container": always mounted, fixed size in cells.
pub struct TermSurface {
    width: u32,
    height: u32,
}

impl TermSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl ChartSurface for TermSurface {
    fn is_mounted(&self) -> bool {
        true
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Chart handle that renders candles as rows of text.
pub struct TermChart {
    width: u32,
    watermark: Option<WatermarkOptions>,
    series: Option<CandleSeriesOptions>,
    candles: Vec<CandlePoint>,
}

impl ChartHandle for TermChart {
    fn apply_price_scale(&mut self, _options: &PriceScaleOptions) {}

    fn apply_watermark(&mut self, options: &WatermarkOptions) {
        self.watermark = Some(options.clone());
    }

    fn apply_crosshair(&mut self, _options: &CrosshairOptions) {}

    fn apply_time_scale(&mut self, _options: &TimeScaleOptions) {}

    fn add_candlestick_series(&mut self, options: &CandleSeriesOptions) {
        self.series = Some(options.clone());
    }

    fn set_candles(&mut self, candles: &[CandlePoint]) {
        self.candles = candles.to_vec();
    }

    fn fit_content(&mut self) {
        // The text renderer rescales on every render.
    }

    fn resize(&mut self, width: u32, _height: u32) {
        self.width = width;
    }
}

impl TermChart {
    pub fn render(&self) -> String {
        let mut out = String::new();
        if let Some(watermark) = &self.watermark
            && watermark.visible
        {
            let _ = writeln!(out, "{}", watermark.text);
        }
        if self.candles.is_empty() {
            out.push_str("(no data)\n");
            return out;
        }

        let precision = self
            .series
            .as_ref()
            .map(|s| s.price_precision as usize)
            .unwrap_or(8);

        let min = self
            .candles
            .iter()
            .map(|c| c.open.min(c.close))
            .min()
            .unwrap_or_default();
        let max = self
            .candles
            .iter()
            .map(|c| c.open.max(c.close))
            .max()
            .unwrap_or_default();

        let bar_cols = (self.width as usize).saturating_sub(45).clamp(10, 60);
        for candle in &self.candles {
            let lo = candle.open.min(candle.close);
            let hi = candle.open.max(candle.close);
            let start = scale(lo, min, max, bar_cols);
            let end = scale(hi, min, max, bar_cols);

            let mut bar = String::with_capacity(bar_cols);
            for col in 0..bar_cols {
                bar.push(if col >= start && col <= end { '#' } else { '.' });
            }

            let direction = if candle.close >= candle.open { '+' } else { '-' };
            let time = format_time(candle.time);
            let _ = writeln!(
                out,
                "{time} {direction} {:>width$} -> {:>width$} |{bar}|",
                candle.open.round_dp(precision as u32),
                candle.close.round_dp(precision as u32),
                width = precision + 4,
            );
        }
        out
    }
}

fn scale(value: Decimal, min: Decimal, max: Decimal, cols: usize) -> usize {
    if max <= min || cols == 0 {
        return 0;
    }
    let span = (max - min).to_f64().unwrap_or(1.0);
    let offset = (value - min).to_f64().unwrap_or(0.0);
    let position = (offset / span * (cols - 1) as f64).round() as usize;
    position.min(cols - 1)
}

fn format_time(unix: i64) -> String {
    match DateTime::<Utc>::from_timestamp(unix, 0) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
        None => unix.to_string(),
    }
}

/// Creates terminal charts.
pub struct TermChartFactory;

impl ChartFactory for TermChartFactory {
    type Handle = TermChart;

    fn create(
        &self,
        _surface: &dyn ChartSurface,
        options: &ChartOptions,
    ) -> Result<TermChart, ChartError> {
        Ok(TermChart {
            width: options.width,
            watermark: None,
            series: None,
            candles: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn chart_with_candles(candles: Vec<CandlePoint>) -> TermChart {
        let mut chart = TermChartFactory
            .create(
                &TermSurface::new(80, 24),
                &ChartOptions {
                    width: 80,
                    height: 24,
                    ..ChartOptions::default()
                },
            )
            .unwrap();
        chart.apply_watermark(&WatermarkOptions {
            text: "KUNI/KCS".into(),
            ..WatermarkOptions::default()
        });
        chart.add_candlestick_series(&CandleSeriesOptions::default());
        chart.set_candles(&candles);
        chart
    }

    #[test]
    fn render_includes_watermark_and_rows() {
        let chart = chart_with_candles(vec![
            CandlePoint {
                time: 3600,
                open: dec!(0.9),
                low: dec!(0.9),
                close: dec!(0.95),
                high: dec!(0.95),
            },
            CandlePoint {
                time: 7200,
                open: dec!(0.95),
                low: dec!(0.95),
                close: dec!(0.92),
                high: dec!(0.92),
            },
        ]);

        let output = chart.render();
        assert!(output.starts_with("KUNI/KCS\n"));
        assert_eq!(output.lines().count(), 3);
        assert!(output.contains("1970-01-01 01:00 +"));
        assert!(output.contains("1970-01-01 02:00 -"));
    }

    #[test]
    fn render_without_data() {
        let chart = chart_with_candles(Vec::new());
        assert!(chart.render().contains("(no data)"));
    }

    #[test]
    fn scale_maps_range_onto_columns() {
        assert_eq!(scale(dec!(1), dec!(1), dec!(2), 10), 0);
        assert_eq!(scale(dec!(2), dec!(1), dec!(2), 10), 9);
        assert_eq!(scale(dec!(1.5), dec!(1), dec!(2), 10), 5);
        // Degenerate range collapses to the left edge
        assert_eq!(scale(dec!(1), dec!(1), dec!(1), 10), 0);
    }

    #[test]
    fn surface_is_always_mounted() {
        let surface = TermSurface::new(80, 24);
        assert!(surface.is_mounted());
        assert_eq!(surface.size(), (80, 24));
    }
}
