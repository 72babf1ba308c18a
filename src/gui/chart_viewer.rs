//! Chart Viewer Widget
//! Central panel showing one rendered chart at a time, scaled to fit.

use crate::charts::RenderedChart;
use egui::load::SizedTexture;
use egui::{ColorImage, RichText, TextureHandle, TextureOptions};

/// Ordered charts plus the lazily uploaded texture for each.
pub struct ChartViewer {
    charts: Vec<RenderedChart>,
    textures: Vec<Option<TextureHandle>>,
    current: usize,
}

impl ChartViewer {
    pub fn new(charts: Vec<RenderedChart>) -> Self {
        let textures = vec![None; charts.len()];
        Self {
            charts,
            textures,
            current: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.charts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }

    /// Zero-based index of the chart on screen.
    pub fn position(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> Option<&RenderedChart> {
        self.charts.get(self.current)
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 >= self.charts.len()
    }

    /// Move to the next chart. Returns false when already on the last one.
    pub fn advance(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.current += 1;
        true
    }

    pub fn show(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        let Some(chart) = self.charts.get(self.current) else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Charts").size(20.0));
            });
            return;
        };

        let texture = self.textures[self.current].get_or_insert_with(|| {
            let image = ColorImage::from_rgb(
                [chart.width as usize, chart.height as usize],
                &chart.pixels,
            );
            ctx.load_texture(chart.kind.file_name(), image, TextureOptions::LINEAR)
        });

        ui.centered_and_justified(|ui| {
            ui.add(egui::Image::from_texture(SizedTexture::from_handle(texture)).shrink_to_fit());
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::ChartKind;

    fn blank(kind: ChartKind) -> RenderedChart {
        RenderedChart {
            kind,
            width: 2,
            height: 2,
            pixels: vec![255; 12],
        }
    }

    #[test]
    fn test_advance_stops_at_last_chart() {
        let mut viewer = ChartViewer::new(vec![
            blank(ChartKind::RatingDistribution),
            blank(ChartKind::AppsPerCategory),
        ]);

        assert_eq!(viewer.position(), 0);
        assert!(!viewer.is_last());
        assert!(viewer.advance());
        assert_eq!(
            viewer.current().map(|c| c.kind),
            Some(ChartKind::AppsPerCategory)
        );
        assert!(viewer.is_last());
        assert!(!viewer.advance());
        assert_eq!(viewer.position(), 1);
    }

    #[test]
    fn test_empty_viewer() {
        let mut viewer = ChartViewer::new(Vec::new());
        assert!(viewer.is_empty());
        assert!(viewer.current().is_none());
        assert!(!viewer.advance());
    }
}
