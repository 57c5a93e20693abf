//! Chart dispatch over tables that went through a real upload

use csvboard::core::RowWindow;
use csvboard::services::chart_service::{dispatch, ChartSpec, MISSING_Y_WARNING};
use csvboard::services::ChartOptions;
use csvboard::{ChartKind, ChartOutcome, ChartRequest, DataService};
use pretty_assertions::assert_eq;

const SALES: &[u8] = b"region,units,price\nnorth,3,1.5\nnorth,4,2.5\nsouth,5,2\n";

fn sales_service() -> (DataService, String) {
    let service = DataService::open_in_memory().unwrap();
    let name = service.import_bytes("sales.csv", SALES).unwrap().table_name;
    (service, name)
}

fn run(service: &DataService, table: &str, kind: &str, x: &str, y: Option<&str>) -> ChartOutcome {
    let frame = service.get_table(table).unwrap().read_all().unwrap();
    let request = ChartRequest::new(ChartKind::parse(kind).unwrap(), x, y.map(str::to_string));
    dispatch(&frame, &request, &ChartOptions::default()).unwrap()
}

#[test]
fn test_scatter_without_y_warns() {
    let (service, table) = sales_service();
    assert_eq!(
        run(&service, &table, "Dispersión", "units", None),
        ChartOutcome::Warning(MISSING_Y_WARNING.to_string())
    );
    assert_eq!(
        run(&service, &table, "Boxplot", "region", None),
        ChartOutcome::Warning(MISSING_Y_WARNING.to_string())
    );
}

#[test]
fn test_pie_counts_regions() {
    let (service, table) = sales_service();
    assert_eq!(
        run(&service, &table, "Pastel", "region", None),
        ChartOutcome::Chart(ChartSpec::Pie {
            label: "region".to_string(),
            slices: vec![("north".to_string(), 2), ("south".to_string(), 1)],
        })
    );
}

#[test]
fn test_bars_with_and_without_y() {
    let (service, table) = sales_service();

    assert_eq!(
        run(&service, &table, "Barras", "region", None),
        ChartOutcome::Chart(ChartSpec::Bars {
            x_label: "region".to_string(),
            y_label: "count".to_string(),
            bars: vec![("north".to_string(), 2.0), ("south".to_string(), 1.0)],
        })
    );
    assert_eq!(
        run(&service, &table, "Barras", "region", Some("units")),
        ChartOutcome::Chart(ChartSpec::Bars {
            x_label: "region".to_string(),
            y_label: "units".to_string(),
            bars: vec![("north".to_string(), 7.0), ("south".to_string(), 5.0)],
        })
    );
}

#[test]
fn test_histogram_and_boxplot_render_data() {
    let (service, table) = sales_service();

    match run(&service, &table, "Histograma", "units", None) {
        ChartOutcome::Chart(ChartSpec::Histogram { bins, .. }) => {
            assert_eq!(bins.iter().map(|b| b.count).sum::<u64>(), 3);
        }
        other => panic!("expected a histogram, got {:?}", other),
    }

    match run(&service, &table, "box", "region", Some("price")) {
        ChartOutcome::Chart(ChartSpec::Boxplot { groups, .. }) => {
            assert_eq!(groups.len(), 2);
            assert_eq!(groups[0].label, "north");
            assert_eq!(groups[0].median, 2.0);
        }
        other => panic!("expected a boxplot, got {:?}", other),
    }
}

#[test]
fn test_row_window_subset() {
    let (service, table) = sales_service();
    let stored = service.get_table(&table).unwrap();

    let mut window = RowWindow::new(stored.row_count().unwrap(), 100);
    assert_eq!(window.selected(), 3);
    window.set(2);

    let frame = stored.head(window.selected()).unwrap();
    let request = ChartRequest::new(ChartKind::Pie, "region", None);
    assert_eq!(
        dispatch(&frame, &request, &ChartOptions::default()).unwrap(),
        ChartOutcome::Chart(ChartSpec::Pie {
            label: "region".to_string(),
            slices: vec![("north".to_string(), 2)],
        })
    );
}

#[test]
fn test_unknown_labels_and_columns() {
    let (service, table) = sales_service();
    assert!(ChartKind::parse("Radar").is_err());

    let frame = service.get_table(&table).unwrap().read_all().unwrap();
    let request = ChartRequest::new(ChartKind::Bar, "missing", None);
    assert!(dispatch(&frame, &request, &ChartOptions::default()).is_err());
}
