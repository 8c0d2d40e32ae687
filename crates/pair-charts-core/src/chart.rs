use rust_decimal::Decimal;
use tracing::debug;

use crate::candle::CandlePoint;
use crate::currency::Currency;
use crate::error::ChartError;

/// Watermark placeholder shown for the base slot when the native asset is selected.
pub const WATERMARK_BASE_PLACEHOLDER: &str = "KUNI";
/// Watermark placeholder shown for the quote slot when the native asset is selected.
pub const WATERMARK_QUOTE_PLACEHOLDER: &str = "KCS";

/// Background and text styling. Colors are the exchange frontend theme.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutOptions {
    pub background_color: String,
    pub text_color: String,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            background_color: "rgba(26, 25, 16)".into(),
            text_color: "rgb(255, 255, 255)".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridOptions {
    pub vert_line_color: String,
    pub horz_line_color: String,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            vert_line_color: "#334158".into(),
            horz_line_color: "#334158".into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceScaleMode {
    Normal,
    Logarithmic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceScalePosition {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriceScaleOptions {
    pub position: PriceScalePosition,
    pub mode: PriceScaleMode,
    pub auto_scale: bool,
    pub invert_scale: bool,
    pub align_labels: bool,
    pub border_visible: bool,
    pub border_color: String,
    pub scale_margin_top: f64,
    pub scale_margin_bottom: f64,
}

impl Default for PriceScaleOptions {
    fn default() -> Self {
        Self {
            position: PriceScalePosition::Right,
            mode: PriceScaleMode::Logarithmic,
            auto_scale: true,
            invert_scale: false,
            align_labels: true,
            border_visible: true,
            border_color: "#ffce2b".into(),
            scale_margin_top: 0.3,
            scale_margin_bottom: 0.25,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorzAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertAlign {
    Top,
    Center,
    Bottom,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WatermarkOptions {
    pub color: String,
    pub visible: bool,
    pub text: String,
    pub font_size: u32,
    pub horz_align: HorzAlign,
    pub vert_align: VertAlign,
}

impl Default for WatermarkOptions {
    fn default() -> Self {
        Self {
            color: "#FFFFFF".into(),
            visible: true,
            text: String::new(),
            font_size: 24,
            horz_align: HorzAlign::Left,
            vert_align: VertAlign::Bottom,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Solid,
    Dotted,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CrosshairLineOptions {
    pub color: String,
    pub width: f64,
    pub style: LineStyle,
    pub visible: bool,
    pub label_visible: bool,
    pub label_background_color: String,
}

impl CrosshairLineOptions {
    fn yellow(style: LineStyle) -> Self {
        Self {
            color: "#FFCE2B".into(),
            width: 0.5,
            style,
            visible: true,
            label_visible: true,
            label_background_color: "#FFCE2B".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CrosshairOptions {
    pub vert_line: CrosshairLineOptions,
    pub horz_line: CrosshairLineOptions,
}

impl Default for CrosshairOptions {
    fn default() -> Self {
        Self {
            vert_line: CrosshairLineOptions::yellow(LineStyle::Dotted),
            horz_line: CrosshairLineOptions::yellow(LineStyle::Solid),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimeScaleOptions {
    pub right_offset: u32,
    pub bar_spacing: u32,
    pub fix_left_edge: bool,
    pub lock_visible_time_range_on_resize: bool,
    pub right_bar_stays_on_scroll: bool,
    pub border_visible: bool,
    pub border_color: String,
    pub visible: bool,
    pub time_visible: bool,
    pub seconds_visible: bool,
}

impl Default for TimeScaleOptions {
    fn default() -> Self {
        Self {
            right_offset: 12,
            bar_spacing: 3,
            fix_left_edge: true,
            lock_visible_time_range_on_resize: true,
            right_bar_stays_on_scroll: true,
            border_visible: false,
            border_color: "#fff000".into(),
            visible: true,
            time_visible: true,
            seconds_visible: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CandleSeriesOptions {
    pub up_color: String,
    pub down_color: String,
    pub border_up_color: String,
    pub border_down_color: String,
    pub wick_up_color: String,
    pub wick_down_color: String,
    /// Decimal places shown on the price scale.
    pub price_precision: u32,
    pub price_min_move: Decimal,
}

impl Default for CandleSeriesOptions {
    fn default() -> Self {
        Self {
            up_color: "#4bffb5".into(),
            down_color: "#ff4976".into(),
            border_up_color: "#4bffb5".into(),
            border_down_color: "#ff4976".into(),
            wick_up_color: "#838ca1".into(),
            wick_down_color: "#838ca1".into(),
            price_precision: 8,
            price_min_move: Decimal::new(1, 6),
        }
    }
}

/// Options passed at chart creation time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartOptions {
    pub width: u32,
    pub height: u32,
    pub layout: LayoutOptions,
    pub grid: GridOptions,
}

/// Complete styling bundle for a chart and its candle series.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartTheme {
    pub layout: LayoutOptions,
    pub grid: GridOptions,
    pub price_scale: PriceScaleOptions,
    pub watermark: WatermarkOptions,
    pub crosshair: CrosshairOptions,
    pub time_scale: TimeScaleOptions,
    pub series: CandleSeriesOptions,
}

/// Mount point for a chart, provided by the embedding page.
pub trait ChartSurface {
    fn is_mounted(&self) -> bool;
    /// Current content-box size in pixels.
    fn size(&self) -> (u32, u32);
}

/// A live chart handle from the charting library. Dropping the handle
/// releases the underlying chart.
pub trait ChartHandle {
    fn apply_price_scale(&mut self, options: &PriceScaleOptions);
    fn apply_watermark(&mut self, options: &WatermarkOptions);
    fn apply_crosshair(&mut self, options: &CrosshairOptions);
    fn apply_time_scale(&mut self, options: &TimeScaleOptions);
    fn add_candlestick_series(&mut self, options: &CandleSeriesOptions);
    fn set_candles(&mut self, candles: &[CandlePoint]);
    fn fit_content(&mut self);
    fn resize(&mut self, width: u32, height: u32);
}

/// Creates chart handles on a surface.
pub trait ChartFactory {
    type Handle: ChartHandle;

    fn create(
        &self,
        surface: &dyn ChartSurface,
        options: &ChartOptions,
    ) -> Result<Self::Handle, ChartError>;
}

/// Watermark label for the current selection, e.g. "KUNI/KCS". Native
/// selections fall back to fixed per-slot placeholders.
pub fn watermark_label(currency0: &Currency, currency1: &Currency) -> String {
    let base = if currency0.is_native() {
        WATERMARK_BASE_PLACEHOLDER
    } else {
        currency0.symbol()
    };
    let quote = if currency1.is_native() {
        WATERMARK_QUOTE_PLACEHOLDER
    } else {
        currency1.symbol()
    };
    format!("{base}/{quote}")
}

/// Owns the single live chart for the page.
///
/// Invariant: at most one chart exists at a time. Creation happens on the
/// first data arrival, teardown only on a committed selection change, and
/// dropping the lifecycle releases whatever chart is live.
pub struct ChartLifecycle<F: ChartFactory> {
    factory: F,
    theme: ChartTheme,
    chart: Option<F::Handle>,
}

impl<F: ChartFactory> ChartLifecycle<F> {
    pub fn new(factory: F) -> Self {
        Self::with_theme(factory, ChartTheme::default())
    }

    pub fn with_theme(factory: F, theme: ChartTheme) -> Self {
        Self {
            factory,
            theme,
            chart: None,
        }
    }

    pub fn is_created(&self) -> bool {
        self.chart.is_some()
    }

    pub fn chart(&self) -> Option<&F::Handle> {
        self.chart.as_ref()
    }

    /// Create the chart and inject the first candle set.
    ///
    /// No-op if a chart already exists. Creation is gated on the surface
    /// being mounted and non-zero sized.
    pub fn create(
        &mut self,
        surface: &dyn ChartSurface,
        currency0: &Currency,
        currency1: &Currency,
        candles: &[CandlePoint],
    ) -> Result<(), ChartError> {
        if self.chart.is_some() {
            return Ok(());
        }
        if !surface.is_mounted() {
            return Err(ChartError::SurfaceNotMounted);
        }
        let (width, height) = surface.size();
        if width == 0 || height == 0 {
            return Err(ChartError::SurfaceNotSized { width, height });
        }

        let mut chart = self.factory.create(
            surface,
            &ChartOptions {
                width,
                height,
                layout: self.theme.layout.clone(),
                grid: self.theme.grid.clone(),
            },
        )?;

        chart.apply_price_scale(&self.theme.price_scale);
        chart.apply_watermark(&WatermarkOptions {
            text: watermark_label(currency0, currency1),
            ..self.theme.watermark.clone()
        });
        chart.apply_crosshair(&self.theme.crosshair);
        chart.apply_time_scale(&self.theme.time_scale);

        chart.add_candlestick_series(&self.theme.series);
        chart.set_candles(candles);
        chart.fit_content();

        debug!(candles = candles.len(), width, height, "chart created");
        self.chart = Some(chart);
        Ok(())
    }

    /// Replace the candle data on the existing chart (time-window change).
    /// No-op when no chart exists.
    pub fn refresh(&mut self, candles: &[CandlePoint]) {
        if let Some(chart) = &mut self.chart {
            chart.set_candles(candles);
            chart.fit_content();
            debug!(candles = candles.len(), "chart data refreshed");
        }
    }

    /// Destroy the chart so the next data arrival recreates it.
    /// Called when a new currency selection is committed, never on a data
    /// refresh for the same pair.
    pub fn teardown(&mut self) {
        if self.chart.take().is_some() {
            debug!("chart torn down");
        }
    }

    /// Resize the chart to the container's new content box, then re-fit the
    /// visible range. Safe to call when no chart exists yet.
    pub fn handle_resize(&mut self, width: u32, height: u32) {
        if let Some(chart) = &mut self.chart {
            chart.resize(width, height);
            chart.fit_content();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::{Currency, DEFAULT_CHAIN_ID};
    use rust_decimal_macros::dec;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct FakeSurface {
        mounted: bool,
        width: u32,
        height: u32,
    }

    impl ChartSurface for FakeSurface {
        fn is_mounted(&self) -> bool {
            self.mounted
        }
        fn size(&self) -> (u32, u32) {
            (self.width, self.height)
        }
    }

    fn mounted_surface() -> FakeSurface {
        FakeSurface {
            mounted: true,
            width: 800,
            height: 400,
        }
    }

    #[derive(Default)]
    struct FakeChart {
        calls: Rc<RefCell<Vec<String>>>,
        watermark: String,
        candles: Vec<CandlePoint>,
    }

    impl ChartHandle for FakeChart {
        fn apply_price_scale(&mut self, _: &PriceScaleOptions) {
            self.calls.borrow_mut().push("price_scale".into());
        }
        fn apply_watermark(&mut self, options: &WatermarkOptions) {
            self.watermark = options.text.clone();
            self.calls.borrow_mut().push("watermark".into());
        }
        fn apply_crosshair(&mut self, _: &CrosshairOptions) {
            self.calls.borrow_mut().push("crosshair".into());
        }
        fn apply_time_scale(&mut self, _: &TimeScaleOptions) {
            self.calls.borrow_mut().push("time_scale".into());
        }
        fn add_candlestick_series(&mut self, _: &CandleSeriesOptions) {
            self.calls.borrow_mut().push("series".into());
        }
        fn set_candles(&mut self, candles: &[CandlePoint]) {
            self.candles = candles.to_vec();
            self.calls.borrow_mut().push("set_candles".into());
        }
        fn fit_content(&mut self) {
            self.calls.borrow_mut().push("fit_content".into());
        }
        fn resize(&mut self, width: u32, height: u32) {
            self.calls
                .borrow_mut()
                .push(format!("resize {width}x{height}"));
        }
    }

    struct FakeFactory {
        calls: Rc<RefCell<Vec<String>>>,
        created: Rc<RefCell<u32>>,
    }

    impl FakeFactory {
        fn new() -> (Self, Rc<RefCell<Vec<String>>>, Rc<RefCell<u32>>) {
            let calls = Rc::new(RefCell::new(Vec::new()));
            let created = Rc::new(RefCell::new(0));
            (
                Self {
                    calls: calls.clone(),
                    created: created.clone(),
                },
                calls,
                created,
            )
        }
    }

    impl ChartFactory for FakeFactory {
        type Handle = FakeChart;

        fn create(
            &self,
            _surface: &dyn ChartSurface,
            _options: &ChartOptions,
        ) -> Result<FakeChart, ChartError> {
            *self.created.borrow_mut() += 1;
            self.calls.borrow_mut().push("create".into());
            Ok(FakeChart {
                calls: self.calls.clone(),
                ..FakeChart::default()
            })
        }
    }

    fn candle() -> CandlePoint {
        CandlePoint {
            time: 1000,
            open: dec!(0.9),
            low: dec!(0.9),
            close: dec!(0.95),
            high: dec!(0.95),
        }
    }

    fn selection() -> (Currency, Currency) {
        Currency::default_selection()
    }

    #[test]
    fn create_applies_options_in_order() {
        let (factory, calls, _) = FakeFactory::new();
        let mut lifecycle = ChartLifecycle::new(factory);
        let (c0, c1) = selection();

        lifecycle
            .create(&mounted_surface(), &c0, &c1, &[candle()])
            .unwrap();

        assert_eq!(
            *calls.borrow(),
            vec![
                "create",
                "price_scale",
                "watermark",
                "crosshair",
                "time_scale",
                "series",
                "set_candles",
                "fit_content",
            ]
        );
    }

    #[test]
    fn create_is_idempotent_while_chart_exists() {
        let (factory, _, created) = FakeFactory::new();
        let mut lifecycle = ChartLifecycle::new(factory);
        let (c0, c1) = selection();
        let surface = mounted_surface();

        lifecycle.create(&surface, &c0, &c1, &[candle()]).unwrap();
        lifecycle.create(&surface, &c0, &c1, &[candle()]).unwrap();

        assert_eq!(*created.borrow(), 1);
    }

    #[test]
    fn create_rejects_unmounted_surface() {
        let (factory, _, _) = FakeFactory::new();
        let mut lifecycle = ChartLifecycle::new(factory);
        let (c0, c1) = selection();
        let surface = FakeSurface {
            mounted: false,
            width: 800,
            height: 400,
        };

        let result = lifecycle.create(&surface, &c0, &c1, &[candle()]);
        assert!(matches!(result, Err(ChartError::SurfaceNotMounted)));
        assert!(!lifecycle.is_created());
    }

    #[test]
    fn create_rejects_zero_sized_surface() {
        let (factory, _, _) = FakeFactory::new();
        let mut lifecycle = ChartLifecycle::new(factory);
        let (c0, c1) = selection();
        let surface = FakeSurface {
            mounted: true,
            width: 0,
            height: 400,
        };

        let result = lifecycle.create(&surface, &c0, &c1, &[candle()]);
        assert!(matches!(
            result,
            Err(ChartError::SurfaceNotSized {
                width: 0,
                height: 400
            })
        ));
    }

    #[test]
    fn watermark_uses_symbols_with_native_placeholders() {
        let (kuni, native) = selection();
        assert_eq!(watermark_label(&kuni, &native), "KUNI/KCS");

        let wkcs = Currency::token(DEFAULT_CHAIN_ID, "0xabc", 18, "WKCS");
        assert_eq!(watermark_label(&kuni, &wkcs), "KUNI/WKCS");

        let native0 = Currency::native(DEFAULT_CHAIN_ID);
        assert_eq!(watermark_label(&native0, &wkcs), "KUNI/WKCS");
    }

    #[test]
    fn watermark_text_reaches_the_chart() {
        let (factory, _, _) = FakeFactory::new();
        let mut lifecycle = ChartLifecycle::new(factory);
        let (c0, c1) = selection();

        lifecycle
            .create(&mounted_surface(), &c0, &c1, &[candle()])
            .unwrap();
        assert_eq!(lifecycle.chart().unwrap().watermark, "KUNI/KCS");
    }

    #[test]
    fn teardown_then_recreate() {
        let (factory, _, created) = FakeFactory::new();
        let mut lifecycle = ChartLifecycle::new(factory);
        let (c0, c1) = selection();
        let surface = mounted_surface();

        lifecycle.create(&surface, &c0, &c1, &[candle()]).unwrap();
        lifecycle.teardown();
        assert!(!lifecycle.is_created());

        lifecycle.create(&surface, &c0, &c1, &[candle()]).unwrap();
        assert_eq!(*created.borrow(), 2);
    }

    #[test]
    fn refresh_updates_data_without_recreating() {
        let (factory, calls, created) = FakeFactory::new();
        let mut lifecycle = ChartLifecycle::new(factory);
        let (c0, c1) = selection();

        lifecycle
            .create(&mounted_surface(), &c0, &c1, &[candle()])
            .unwrap();
        calls.borrow_mut().clear();

        lifecycle.refresh(&[candle(), candle()]);
        assert_eq!(*created.borrow(), 1);
        assert_eq!(*calls.borrow(), vec!["set_candles", "fit_content"]);
        assert_eq!(lifecycle.chart().unwrap().candles.len(), 2);
    }

    #[test]
    fn resize_without_chart_is_noop() {
        let (factory, _, created) = FakeFactory::new();
        let mut lifecycle = ChartLifecycle::new(factory);

        lifecycle.handle_resize(640, 480);
        assert_eq!(*created.borrow(), 0);
    }

    #[test]
    fn resize_then_refit() {
        let (factory, calls, _) = FakeFactory::new();
        let mut lifecycle = ChartLifecycle::new(factory);
        let (c0, c1) = selection();

        lifecycle
            .create(&mounted_surface(), &c0, &c1, &[candle()])
            .unwrap();
        calls.borrow_mut().clear();

        lifecycle.handle_resize(640, 480);
        assert_eq!(*calls.borrow(), vec!["resize 640x480", "fit_content"]);
    }
}
