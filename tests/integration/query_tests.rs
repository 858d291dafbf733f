//! Integration tests for the read boundary
//!
//! Each test lays out a data directory by hand, the way the published files
//! look on disk, and queries it through `Indicators`.

use indicadores::{Category, DailySeries, DataStore, IndicadoresError, Indicators, Lookup};
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_file(root: &Path, category: &str, name: &str, content: &str) {
    let dir = root.join(category);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(name), content).unwrap();
}

fn write_json(root: &Path, category: &str, name: &str, value: Value) {
    write_file(root, category, name, &value.to_string());
}

fn indicators(dir: &TempDir) -> Indicators {
    Indicators::new(DataStore::new(dir.path()))
}

#[test]
fn test_missing_category_is_not_found() {
    let dir = TempDir::new().unwrap();
    let result = indicators(&dir).current(DailySeries::Icl);
    assert!(matches!(
        result,
        Err(IndicadoresError::CategoryNotFound { ref category }) if category == "icl"
    ));
}

#[test]
fn test_empty_latest_is_no_data() {
    let dir = TempDir::new().unwrap();
    write_json(dir.path(), "icl", "latest.json", json!([]));

    let result = indicators(&dir).current(DailySeries::Icl).unwrap();
    assert_eq!(result, Lookup::NoData);
}

#[test]
fn test_current_reads_first_element() {
    let dir = TempDir::new().unwrap();
    write_json(
        dir.path(),
        "uvi",
        "latest.json",
        json!([
            {"fecha": "05/01/2024", "valor": 1012.34, "descripcion": "Unidad de Vivienda (UVI)"},
            {"fecha": "04/01/2024", "valor": 1011.0}
        ]),
    );

    let current = indicators(&dir)
        .current(DailySeries::Uvi)
        .unwrap()
        .into_option()
        .unwrap();
    assert_eq!(current.fecha, "05/01/2024");
    assert_eq!(current.valor.as_f64(), Some(1012.34));
}

#[test]
fn test_history_skips_corrupt_file() {
    let dir = TempDir::new().unwrap();
    write_json(dir.path(), "icl", "2024-01-01.json", json!([{"fecha": "01/01/2024", "valor": 1.0}]));
    write_file(dir.path(), "icl", "2024-01-02.json", "{ this is not json");

    let history = indicators(&dir)
        .history(DailySeries::Icl)
        .into_option()
        .unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].fecha, "01/01/2024");
}

#[test]
fn test_history_is_chronological_with_mixed_formats() {
    let dir = TempDir::new().unwrap();
    write_json(dir.path(), "uva", "b.json", json!([{"fecha": "2024-03-01", "valor": 3.0}]));
    write_json(dir.path(), "uva", "a.json", json!([{"fecha": "01/02/2024", "valor": 2.0}]));
    write_json(dir.path(), "uva", "2024-01-01.json", json!([{"valor": 1.0}]));
    write_json(dir.path(), "uva", "latest.json", json!([{"fecha": "01/03/2024", "valor": 3.0}]));

    let history = indicators(&dir)
        .history(DailySeries::Uva)
        .into_option()
        .unwrap();
    let values: Vec<f64> = history.iter().filter_map(|r| r.valor.as_f64()).collect();
    assert_eq!(values, vec![1.0, 2.0, 3.0]);
}

#[test]
fn test_history_of_missing_directory_is_no_data() {
    let dir = TempDir::new().unwrap();
    assert_eq!(indicators(&dir).history(DailySeries::Uvi), Lookup::NoData);
}

#[test]
fn test_range_is_inclusive() {
    let dir = TempDir::new().unwrap();
    for (stem, fecha, valor) in [
        ("2024-01-01", "01/01/2024", 1.0),
        ("2024-02-01", "01/02/2024", 2.0),
        ("2024-03-01", "01/03/2024", 3.0),
    ] {
        write_json(dir.path(), "icl", &format!("{}.json", stem), json!([{"fecha": fecha, "valor": valor}]));
    }

    let indicators = indicators(&dir);
    let selected = indicators
        .range(DailySeries::Icl, "2024-01-01", "2024-02-01")
        .into_option()
        .unwrap();
    let values: Vec<f64> = selected.iter().filter_map(|r| r.valor.as_f64()).collect();
    assert_eq!(values, vec![1.0, 2.0]);

    assert_eq!(
        indicators.range(DailySeries::Icl, "enero", "2024-02-01"),
        Lookup::NoData
    );
}

#[test]
fn test_ipc_current_history_and_range() {
    let dir = TempDir::new().unwrap();
    write_json(
        dir.path(),
        "ipc",
        "latest.json",
        json!([{"mes": 3, "anio": 2024, "nombre_mes": "marzo", "indice_ipc": 11.0, "fuente": "INDEC"}]),
    );
    write_json(dir.path(), "ipc", "2024-03.json", json!([{"mes": 3, "anio": 2024, "nombre_mes": "marzo", "indice_ipc": 11.0}]));
    write_json(dir.path(), "ipc", "2024-01.json", json!([{"mes": 1, "nombre_mes": "enero", "indice_ipc": 20.6}]));
    write_json(dir.path(), "ipc", "2023-12.json", json!([{"mes": 12, "anio": 2023, "indice_ipc": 25.5}]));
    write_json(dir.path(), "ipc", "roto.json", json!([{"anio": 2024, "indice_ipc": 1.0}]));

    let indicators = indicators(&dir);

    let current = indicators.ipc_current().unwrap().into_option().unwrap();
    assert_eq!(current.mes, 3);
    assert_eq!(current.extra.get("fuente"), Some(&json!("INDEC")));

    let history = indicators.ipc_history().into_option().unwrap();
    let periods: Vec<(i32, u32)> = history.iter().map(|r| (r.anio, r.mes)).collect();
    assert_eq!(periods, vec![(2023, 12), (2024, 1), (2024, 3)]);

    let range = indicators.ipc_range("2024-01", "2024-03").into_option().unwrap();
    assert_eq!(range.len(), 2);
    assert_eq!(range[0].valor.as_f64(), Some(20.6));

    assert_eq!(indicators.ipc_range("2024-1-1", "2024-03"), Lookup::NoData);
}

#[test]
fn test_river_lookup() {
    let dir = TempDir::new().unwrap();
    write_json(
        dir.path(),
        "rios",
        "latest.json",
        json!([{
            "source": "prefectura_naval_argentina",
            "updated_at": "2026-01-25T12:00:00Z",
            "rios": [{
                "nombre": "PARANÁ",
                "estado_general": "baja",
                "puertos": [{
                    "nombre": "ROSARIO",
                    "rio": "PARANÁ",
                    "altura_m": 3.25,
                    "variacion_m": -0.04,
                    "periodo": "24 HS",
                    "fecha": "2026-01-25",
                    "hora": "09:00",
                    "estado": "baja",
                    "estado_raw": "BAJA"
                }],
                "resumen": {
                    "puertos_total": 1, "crece": 0, "baja": 1, "estac": 0, "s/e": 0,
                    "desconocido": 0, "altura_promedio_m": 3.25,
                    "altura_max_m": 3.25, "altura_min_m": 3.25
                }
            }]
        }]),
    );

    let indicators = indicators(&dir);
    let parana = indicators.river("parana").unwrap().into_option().unwrap();
    assert_eq!(parana.stations[0].port_name, "ROSARIO");
    assert_eq!(indicators.river("Salado").unwrap(), Lookup::NoData);
}

#[test]
fn test_river_report_without_station_river_or_raw_state() {
    let dir = TempDir::new().unwrap();
    write_json(
        dir.path(),
        "rios",
        "latest.json",
        json!([{
            "source": "prefectura_naval_argentina",
            "updated_at": "2026-01-25T12:00:00.123456+00:00",
            "rios": [{
                "nombre": "URUGUAY",
                "estado_general": "crece",
                "puertos": [
                    {"nombre": "CONCORDIA", "altura_m": 5.1, "variacion_m": 0.2,
                     "periodo": "24 HS", "estado": "crece", "fecha": "2026-01-25", "hora": "08:00"},
                    {"nombre": "SALTO", "altura_m": null, "variacion_m": null,
                     "periodo": "24 HS", "estado": "desconocido", "fecha": null, "hora": null}
                ],
                "resumen": {
                    "puertos_total": 2, "crece": 1, "baja": 0, "estac": 0, "s/e": 0,
                    "altura_promedio_m": 5.1, "altura_max_m": 5.1, "altura_min_m": 5.1
                }
            }]
        }]),
    );

    let indicators = indicators(&dir);
    let report = indicators.rivers().unwrap().into_option().unwrap();
    assert_eq!(report.station_count(), 2);

    let uruguay = indicators.river("Uruguay").unwrap().into_option().unwrap();
    assert_eq!(uruguay.stations[0].river_name, "URUGUAY");
    assert_eq!(uruguay.stations[0].state_raw, None);
    assert_eq!(uruguay.stations[1].height_m, None);
    assert_eq!(uruguay.summary.desconocido, 1);
}

#[test]
fn test_fuel_queries() {
    let dir = TempDir::new().unwrap();
    write_json(
        dir.path(),
        "combustibles",
        "latest.json",
        json!([
            {"provincia": "Córdoba", "empresa": "YPF", "combustible": "Nafta Súper", "precios": {"a": 1000, "b": 1200}},
            {"provincia": "Córdoba", "empresa": "Shell", "combustible": "Gasoil", "precios": {"a": 950}},
            {"provincia": "Mendoza", "empresa": "YPF", "combustible": "Nafta Súper", "precios": {"a": "s/d"}}
        ]),
    );

    let indicators = indicators(&dir);
    assert_eq!(indicators.fuels().unwrap().into_option().unwrap().len(), 3);
    assert_eq!(
        indicators.fuels_by_province("CÓRDOBA").unwrap().into_option().unwrap().len(),
        2
    );
    assert_eq!(
        indicators.fuels_by_company("ypf").unwrap().into_option().unwrap().len(),
        2
    );
    assert_eq!(indicators.fuels_by_company("Axion").unwrap(), Lookup::NoData);

    assert_eq!(
        indicators.average_fuel_price("cordoba", "nafta-super").unwrap(),
        Lookup::Found(1100.0)
    );
    assert_eq!(
        indicators.average_fuel_price("Mendoza", "Nafta Súper").unwrap(),
        Lookup::NoData
    );
}

#[test]
fn test_snapshot_categories_have_directories() {
    let dir = TempDir::new().unwrap();
    let store = DataStore::new(dir.path());
    assert_eq!(store.category_dir(Category::Combustibles), dir.path().join("combustibles"));
    assert!(matches!(
        Indicators::new(store).fuels(),
        Err(IndicadoresError::CategoryNotFound { .. })
    ));
}
