use proptest::prelude::*;
use reportgen::config::LayoutSettings;
use reportgen::document::{Cell, Column, Rgb, Table};
use reportgen::print::{DrawOp, Geometry, PageHeader, PaginationController};
use reportgen::{Align, FieldKind};

fn table(rows: usize) -> Table {
    let column = |key: &str, kind, align| Column {
        key: key.into(),
        label: key.into(),
        kind,
        align,
        summable: false,
        width: 0.5,
    };
    let mut table = Table::new(vec![
        column("name", FieldKind::Text, Align::Left),
        column("amount", FieldKind::Number, Align::Right),
    ]);
    for i in 0..rows {
        table.push(vec![Cell::text(format!("Row {i}")), Cell::text(i.to_string())]);
    }
    table
}

fn header() -> PageHeader {
    PageHeader {
        title: "Ledger".into(),
        organization: Some("Acme".into()),
        lines: vec!["Period: 01/01/2024 - 31/03/2024".into()],
        accent: Rgb::BLACK,
        logo: None,
    }
}

fn settings() -> impl Strategy<Value = LayoutSettings> {
    (10.0f32..40.0, 12.0f32..30.0, 20.0f32..160.0).prop_map(|(row_height, header_row_height, bottom_margin)| {
        LayoutSettings {
            row_height,
            header_row_height,
            bottom_margin,
            ..Default::default()
        }
    })
}

proptest! {
    #[test]
    fn page_count_follows_rows_per_page(rows in 1usize..400, settings in settings()) {
        let geometry = Geometry::from_settings(&settings);
        let mut c = PaginationController::new(geometry, header());
        let per_page = c.rows_per_page();
        c.write_table(&table(rows), Rgb::BLACK);
        let pages = c.finish();

        prop_assert_eq!(pages.len(), rows.div_ceil(per_page));
        prop_assert_eq!(pages.iter().map(|p| p.body_rows).sum::<usize>(), rows);
        for page in &pages[..pages.len() - 1] {
            prop_assert_eq!(page.body_rows, per_page);
        }
    }

    #[test]
    fn rows_stay_above_the_bottom_margin(rows in 1usize..200, settings in settings()) {
        let geometry = Geometry::from_settings(&settings);
        let mut c = PaginationController::new(geometry, header());
        c.write_table(&table(rows), Rgb::BLACK);
        for page in c.finish() {
            for op in &page.ops {
                if let DrawOp::Text { y, .. } = op {
                    prop_assert!(*y <= geometry.body_limit());
                }
            }
            prop_assert!(page.contains_text("Ledger"));
            prop_assert!(page.contains_text("amount"));
        }
    }
}
