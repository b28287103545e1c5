//! DPR workbook generation.
//!
//! Renders a [`DprAggregate`] into the fixed DPR template: a title row, the
//! reporting period, one three-column block per site, one row per tracked
//! activity, a TOTAL row, and a trailing weather/remarks section.

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, XlsxError};

use crate::error::{AppError, AppResult};
use crate::models::activity::FIXED_ACTIVITIES;
use crate::services::aggregation::DprAggregate;

/// Attachment filename for a DPR covering up to `date`: `DDMMYYYY-DPR.xlsx`.
pub fn dpr_filename(date: NaiveDate) -> String {
    format!("{}-DPR.xlsx", date.format("%d%m%Y"))
}

/// Render the aggregate into an xlsx workbook and return its bytes.
pub fn render_dpr(grid: &DprAggregate) -> AppResult<Vec<u8>> {
    build_workbook(grid).map_err(|e| AppError::Storage(format!("Workbook generation failed: {}", e)))
}

fn build_workbook(grid: &DprAggregate) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet().set_name("DPR")?;

    let header = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0x4472C4))
        .set_font_color(Color::White)
        .set_border(FormatBorder::Thin)
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_text_wrap();

    let subheader = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0xB4C7E7))
        .set_border(FormatBorder::Thin)
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter);

    let data = Format::new()
        .set_border(FormatBorder::Thin)
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter);

    let activity_cell = Format::new()
        .set_border(FormatBorder::Thin)
        .set_align(FormatAlign::Left)
        .set_align(FormatAlign::VerticalCenter);

    let number = Format::new()
        .set_border(FormatBorder::Thin)
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_num_format("0.00");

    let total = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0xE7E6E6))
        .set_border(FormatBorder::Thin)
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_num_format("0.00");

    let remarks_header = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0xF2F2F2))
        .set_border(FormatBorder::Thin)
        .set_align(FormatAlign::Left)
        .set_align(FormatAlign::VerticalCenter);

    let last_col = (2 + grid.sites.len() * 3) as u16;

    worksheet.set_column_width(0, 5)?;
    worksheet.set_column_width(1, 35)?;
    worksheet.set_column_width(2, 10)?;
    for col in 3..=last_col {
        worksheet.set_column_width(col, 12)?;
    }

    let mut row: u32 = 0;

    worksheet.merge_range(row, 0, row, last_col, "MAHSR-T3 Daily Progress Report", &header)?;
    row += 1;

    let period = format!(
        "Period: {} to {}",
        grid.from.format("%d/%m/%Y"),
        grid.to.format("%d/%m/%Y")
    );
    worksheet.merge_range(row, 0, row, last_col, &period, &subheader)?;
    row += 1;

    worksheet.merge_range(row, 0, row + 1, 0, "S.No", &header)?;
    worksheet.merge_range(row, 1, row + 1, 1, "SCOPE / ACTIVITY", &header)?;
    worksheet.merge_range(row, 2, row + 1, 2, "Unit", &header)?;

    let mut col: u16 = 3;
    for site in &grid.sites {
        worksheet.merge_range(row, col, row, col + 2, &site.site_code, &header)?;
        worksheet.write_with_format(row + 1, col, "Target", &subheader)?;
        worksheet.write_with_format(row + 1, col + 1, "Achieved", &subheader)?;
        worksheet.write_with_format(row + 1, col + 2, "Cumulative", &subheader)?;
        col += 3;
    }
    row += 2;

    for (idx, (activity_name, unit)) in FIXED_ACTIVITIES.iter().enumerate() {
        worksheet.write_with_format(row, 0, (idx + 1) as u32, &data)?;
        worksheet.write_with_format(row, 1, *activity_name, &activity_cell)?;
        worksheet.write_with_format(row, 2, *unit, &data)?;

        let mut col: u16 = 3;
        for site in &grid.sites {
            let cell = site.cells[idx];
            worksheet.write_with_format(row, col, decimal_cell(cell.target), &number)?;
            worksheet.write_with_format(row, col + 1, decimal_cell(cell.achieved), &number)?;
            worksheet.write_with_format(row, col + 2, decimal_cell(cell.cumulative), &number)?;
            col += 3;
        }
        row += 1;
    }

    worksheet.write_with_format(row, 0, "", &total)?;
    worksheet.write_with_format(row, 1, "TOTAL", &total)?;
    worksheet.write_with_format(row, 2, "", &total)?;

    let mut col: u16 = 3;
    for site in &grid.sites {
        worksheet.write_with_format(row, col, decimal_cell(site.totals.target), &total)?;
        worksheet.write_with_format(row, col + 1, decimal_cell(site.totals.achieved), &total)?;
        worksheet.write_with_format(row, col + 2, decimal_cell(site.totals.cumulative), &total)?;
        col += 3;
    }
    row += 2;

    worksheet.merge_range(row, 0, row, last_col, "REMARKS & WEATHER CONDITIONS", &remarks_header)?;
    row += 1;

    for site in &grid.sites {
        if let Some(ref latest) = site.latest {
            let line = format!(
                "{}: Weather - {} | Workers - {} | {}",
                site.site_code,
                latest.weather,
                latest.total_workers,
                latest.remarks.as_deref().unwrap_or("N/A")
            );
            worksheet.merge_range(row, 0, row, last_col, &line, &activity_cell)?;
            row += 1;
        }
    }

    workbook.save_to_buffer()
}

fn decimal_cell(value: rust_decimal::Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::aggregation::aggregate;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_dpr_filename_format() {
        assert_eq!(dpr_filename(date("2025-05-28")), "28052025-DPR.xlsx");
        assert_eq!(dpr_filename(date("2025-12-01")), "01122025-DPR.xlsx");
    }

    #[test]
    fn test_render_empty_grid_produces_valid_workbook() {
        let grid = aggregate(
            &[],
            &["TCB-401".to_string(), "TCB-402".to_string()],
            date("2025-06-01"),
            date("2025-06-30"),
        );

        let bytes = render_dpr(&grid).unwrap();
        // xlsx files are zip archives; check the magic bytes.
        assert!(bytes.len() > 4);
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn test_render_grid_with_no_sites() {
        let grid = aggregate(&[], &[], date("2025-06-01"), date("2025-06-01"));
        let bytes = render_dpr(&grid).unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }
}
