//! Reference dataset loading tests

use forage_server::external::{load_reference_csv, read_reference_csv};
use shared::{resolve, WeatherScenario};

const HEADER: &str = "Site,Cultivar,Tmin(ºC),Tmax(ºC),Precipitation(mm),\
                      Radiation(Mj/m2day),WHC(mm),C(%),pH,AnthesisDate(doy)\n";

#[test]
fn test_reads_rows_and_ignores_extra_columns() {
    let csv = "Site,Year,Cultivar,Tmin(ºC),Tmax(ºC),Precipitation(mm),Radiation(Mj/m2day),\
               WHC(mm),C(%),pH,AnthesisDate(doy),DM(kg/ha)\n\
               Barcia,2016,A200,11.8,21.4,2.9,16.1,142,3.1,5.6,204,18000\n\
               Barcia,2017,A300,12.4,22.0,2.1,17.3,142,3.1,5.6,201,19000\n";
    let data = read_reference_csv(csv.as_bytes()).unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data.records()[0].cultivar.as_deref(), Some("A200"));
    assert_eq!(data.records()[1].radiation_mj_m2_day, 17.3);
}

#[test]
fn test_cultivar_column_is_optional() {
    let csv = "Site,Tmin(ºC),Tmax(ºC),Precipitation(mm),Radiation(Mj/m2day),\
               WHC(mm),C(%),pH,AnthesisDate(doy)\n\
               Barcia,11.8,21.4,2.9,16.1,142,3.1,5.6,204\n";
    let data = read_reference_csv(csv.as_bytes()).unwrap();
    assert_eq!(data.records()[0].cultivar, None);
}

#[test]
fn test_empty_dataset_is_fatal() {
    let err = read_reference_csv(HEADER.as_bytes()).unwrap_err();
    assert!(err.to_string().contains("no rows"));
}

#[test]
fn test_malformed_row_is_fatal() {
    let csv = format!("{}Barcia,A200,cold,21.4,2.9,16.1,142,3.1,5.6,204\n", HEADER);
    let err = read_reference_csv(csv.as_bytes()).unwrap_err();
    assert!(err.to_string().contains("line 2"));
}

#[test]
fn test_missing_file_is_fatal() {
    assert!(load_reference_csv("/nonexistent/reference.csv").is_err());
}

#[test]
fn test_bundled_dataset_resolves_every_site() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/data/reference.csv");
    let data = load_reference_csv(path).unwrap();
    for site in data.sites() {
        let good = resolve(&data, &site, WeatherScenario::Good).unwrap();
        let bad = resolve(&data, &site, WeatherScenario::Bad).unwrap();
        assert_eq!(good.precipitation, bad.precipitation);
        assert!(good.radiation > bad.radiation);
    }
}
