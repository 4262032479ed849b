use std::collections::BTreeMap;

use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot};

use crate::color::ColorMap;
use crate::data::model::{CarDataset, CellValue, Column, ColumnKind};

pub const DEFAULT_BINS: usize = 20;

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// One bar of a chart.
#[derive(Debug, Clone, PartialEq)]
pub struct BarDatum {
    pub label: String,
    /// Bar centre on the x axis.
    pub x: f64,
    pub width: f64,
    pub value: f64,
    /// Category shown by the bar, `None` for numeric bins.
    pub category: Option<CellValue>,
}

/// Sum of `Car_Price` grouped by `column`: one bar per value for categorical
/// columns, `bins` equal-width bins for numeric ones.
pub fn price_by_column(dataset: &CarDataset, column: Column, bins: usize) -> Vec<BarDatum> {
    match column.kind() {
        ColumnKind::Categorical => {
            let mut sums: BTreeMap<CellValue, f64> = BTreeMap::new();
            for record in &dataset.records {
                *sums.entry(record.value(column)).or_default() += record.price;
            }
            category_bars(sums)
        }
        ColumnKind::Numeric => numeric_bins(dataset, column, bins.max(1)),
    }
}

/// Number of listings per brand.
pub fn brand_counts(dataset: &CarDataset) -> Vec<BarDatum> {
    let mut counts: BTreeMap<CellValue, f64> = BTreeMap::new();
    for record in &dataset.records {
        *counts.entry(record.value(Column::Brand)).or_default() += 1.0;
    }
    category_bars(counts)
}

fn category_bars(values: BTreeMap<CellValue, f64>) -> Vec<BarDatum> {
    values
        .into_iter()
        .enumerate()
        .map(|(i, (category, value))| BarDatum {
            label: category.to_string(),
            x: i as f64,
            width: 0.8,
            value,
            category: Some(category),
        })
        .collect()
}

fn numeric_bins(dataset: &CarDataset, column: Column, bins: usize) -> Vec<BarDatum> {
    let Some((min, max)) = dataset.numeric_bounds(column) else {
        return Vec::new();
    };
    let span = max - min;
    let (bins, width) = if span > 0.0 {
        (bins, span / bins as f64)
    } else {
        (1, 1.0)
    };

    let mut sums = vec![0.0; bins];
    for record in &dataset.records {
        let Some(v) = record.numeric(column) else {
            continue;
        };
        // The maximum falls into the last bin.
        let idx = (((v - min) / width) as usize).min(bins - 1);
        sums[idx] += record.price;
    }

    sums.into_iter()
        .enumerate()
        .map(|(i, value)| {
            let lo = if span > 0.0 { min + i as f64 * width } else { min - 0.5 };
            BarDatum {
                label: format!("{lo:.1} – {:.1}", lo + width),
                x: lo + width / 2.0,
                width,
                value,
                category: None,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Draw `data` as a bar chart. Category bars are coloured by `colors`.
pub fn bar_chart(
    ui: &mut Ui,
    id: &str,
    data: &[BarDatum],
    x_label: &str,
    y_label: &str,
    colors: Option<&ColorMap>,
) {
    let bars: Vec<Bar> = data
        .iter()
        .map(|d| {
            let fill = match (&d.category, colors) {
                (Some(category), Some(cm)) => cm.color_for(category),
                _ => Color32::LIGHT_BLUE,
            };
            Bar::new(d.x, d.value)
                .width(d.width)
                .name(&d.label)
                .fill(fill)
        })
        .collect();

    Plot::new(id)
        .legend(Legend::default())
        .x_axis_label(x_label)
        .y_axis_label(y_label)
        .height(420.0)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(false)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name(y_label));
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::sample_dataset;

    #[test]
    fn categorical_bars_sum_price() {
        let ds = sample_dataset();
        let bars = price_by_column(&ds, Column::Brand, DEFAULT_BINS);
        let labels: Vec<_> = bars.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, ["Hyundai", "Maruti", "Tata"]);
        assert_eq!(bars[1].value, 550_000.0 + 700_000.0 + 480_000.0);
        assert_eq!(bars[2].x, 2.0);
    }

    #[test]
    fn numeric_bins_cover_every_row() {
        let ds = sample_dataset();
        let bars = price_by_column(&ds, Column::ProducedYear, 5);
        assert_eq!(bars.len(), 5);
        let total: f64 = bars.iter().map(|b| b.value).sum();
        let expected: f64 = ds.records.iter().map(|r| r.price).sum();
        assert_eq!(total, expected);
        // 2021 is the maximum and lands in the last bin.
        assert_eq!(bars[4].value, 1_100_000.0);
        assert_eq!(bars[0].value, 620_000.0);
    }

    #[test]
    fn constant_column_gets_single_bin() {
        let ds = sample_dataset();
        let bars = price_by_column(&ds, Column::OwnerCount, 10);
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].x, 1.0);
    }

    #[test]
    fn brand_counts_count_rows() {
        let bars = brand_counts(&sample_dataset());
        let counts: Vec<_> = bars.iter().map(|b| b.value).collect();
        assert_eq!(counts, [1.0, 3.0, 1.0]);
    }

    #[test]
    fn empty_dataset_has_no_bars() {
        let ds = CarDataset::default();
        assert!(price_by_column(&ds, Column::Mileage, 10).is_empty());
        assert!(brand_counts(&ds).is_empty());
    }
}
