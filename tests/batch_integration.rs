//! Batch Generation Integration Test
//!
//! Exercises the (crew × report-type) fan-out: progress tracking,
//! per-combination skip/success outcomes, and the batch-level fatal
//! error when no input is usable.

use safra_engine::{BatchRequest, BatchRunner, BatchState, EngineConfig};
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

const CART_FILE: &str = "\
Data;Hora;Equipamento;Grupo Equipamento/Frente;Operador;Estado;Grupo Operacao;Operacao;Codigo da Operacao;Motor Ligado;RPM Motor;Velocidade;RTK (Piloto Automatico)
10/05/2025;07:00:00;6127;Frente 2 - CMAA Canapolis;777 - Maria Souza;TRABALHANDO;Produtiva;6780 - TRANSBORDO;6780;LIGADO;1600;8.0;1
10/05/2025;07:12:00;6127;Frente 2 - CMAA Canapolis;777 - Maria Souza;TRABALHANDO;Produtiva;6780 - TRANSBORDO;6780;LIGADO;1650;7.5;1
10/05/2025;07:24:00;6127;Frente 2 - CMAA Canapolis;777 - Maria Souza;PARADO;Perdida;8340 - FALTA DE APONTAMENTO;8340;LIGADO;900;0;0
10/05/2025;07:36:00;6127;Frente 2 - CMAA Canapolis;777 - Maria Souza;PARADO;Perdida;8340 - FALTA DE APONTAMENTO;8340;LIGADO;900;0;0
";

fn write_temp(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(content.as_bytes()).expect("write temp file");
    file
}

#[tokio::test]
async fn batch_generates_cart_report_and_skips_missing_harvester() {
    let cart = write_temp(CART_FILE);
    let runner = BatchRunner::new(EngineConfig::default());

    let request = BatchRequest {
        harvester_file: None,
        cart_file: Some(cart.path().to_path_buf()),
        fronts: vec!["2".to_string()],
        report_types: vec![
            "colheita_diario".to_string(),
            "transbordo_diario".to_string(),
        ],
        date: "2025-05-10".to_string(),
        date_end: None,
    };

    let reports = runner.process_files("batch-1", request).await.expect("batch runs");

    // Only the cart combination produced a report
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].0, "transbordo_diario_2");

    let status = runner.task_status("batch-1").await.expect("status exists");
    assert_eq!(status.state, BatchState::Completed);
    assert_eq!(status.progress, 100);
    assert_eq!(status.total_reports, 2);
    assert_eq!(status.completed_reports, 2);
    assert_eq!(status.reports.len(), 2);

    // One skipped (no harvester file), one success
    let outcomes: Vec<String> = status
        .reports
        .iter()
        .map(|r| format!("{:?}", r.outcome))
        .collect();
    assert!(outcomes.contains(&"Skipped".to_string()));
    assert!(outcomes.contains(&"Success".to_string()));
}

#[tokio::test]
async fn cart_report_carries_cart_metrics() {
    let cart = write_temp(CART_FILE);
    let runner = BatchRunner::new(EngineConfig::default());

    let request = BatchRequest {
        cart_file: Some(cart.path().to_path_buf()),
        fronts: vec!["2".to_string()],
        report_types: vec!["transbordo_diario".to_string()],
        date: "2025-05-10".to_string(),
        ..Default::default()
    };

    let reports = runner.process_files("batch-2", request).await.unwrap();
    let report = &reports[0].1;

    // Cart reports have missing-timesheet rows, never elevator hours
    assert!(!report.falta_apontamento.is_empty());
    assert!(report.hora_elevador.is_empty());

    // One counted 12-minute missing-timesheet interval (the last reading
    // has no outgoing interval) against 36 engine-on minutes = 1/3
    let falta = &report.falta_apontamento[0];
    assert!(
        (falta.ratio.value - 33.33).abs() < 0.5,
        "missing-timesheet ratio should be ~33.33%, got {}",
        falta.ratio.value
    );

    // GPS usage: both productive intervals ran with auto-pilot + movement
    assert!(!report.uso_gps.is_empty());
    assert_eq!(report.uso_gps[0].ratio.value, 100.0);

    // Cart targets
    assert_eq!(report.metas.get("eficiencia_energetica"), Some(&65.0));
}

#[tokio::test]
async fn unreadable_input_only_is_fatal() {
    let runner = BatchRunner::new(EngineConfig::default());
    let request = BatchRequest {
        cart_file: Some(PathBuf::from("/nonexistent/transbordos.txt")),
        fronts: vec!["1".to_string()],
        report_types: vec!["transbordo_diario".to_string()],
        date: "2025-05-10".to_string(),
        ..Default::default()
    };

    let err = runner.process_files("batch-3", request).await.unwrap_err();
    assert!(err.to_string().contains("No usable input"));

    let status = runner.task_status("batch-3").await.unwrap();
    assert_eq!(status.state, BatchState::Error);
    assert!(status.error.is_some());
}

#[tokio::test]
async fn unreadable_file_does_not_abort_other_combinations() {
    let cart = write_temp(CART_FILE);
    let runner = BatchRunner::new(EngineConfig::default());
    let request = BatchRequest {
        harvester_file: Some(PathBuf::from("/nonexistent/colhedoras.txt")),
        cart_file: Some(cart.path().to_path_buf()),
        fronts: vec!["2".to_string()],
        report_types: vec![
            "colheita_diario".to_string(),
            "transbordo_diario".to_string(),
        ],
        date: "2025-05-10".to_string(),
        ..Default::default()
    };

    let reports = runner.process_files("batch-4", request).await.expect("cart side still runs");
    assert_eq!(reports.len(), 1);

    let status = runner.task_status("batch-4").await.unwrap();
    assert_eq!(status.state, BatchState::Completed);
}

#[tokio::test]
async fn header_only_file_yields_empty_but_valid_report() {
    let cart = write_temp(
        "Data;Hora;Equipamento;Grupo Equipamento/Frente;Operador;Grupo Operacao;Motor Ligado\n",
    );
    let runner = BatchRunner::new(EngineConfig::default());
    let request = BatchRequest {
        cart_file: Some(cart.path().to_path_buf()),
        fronts: vec!["2".to_string()],
        report_types: vec!["transbordo_diario".to_string()],
        date: "2025-05-10".to_string(),
        ..Default::default()
    };

    let reports = runner.process_files("batch-5", request).await.unwrap();
    assert_eq!(reports.len(), 1);
    let report = &reports[0].1;
    assert!(report.disponibilidade_mecanica.is_empty());
    assert!(report.falta_apontamento.is_empty());
    // Metadata and targets are still populated
    assert_eq!(report.meta.front, "2");
    assert!(!report.metas.is_empty());
}
