//! Pipeline Integration Test
//!
//! Exercises the full single-file path: raw delimited bytes ->
//! RecordNormalizer -> TimeSegmenter -> Reconciler -> Aggregator ->
//! ReportAssembler, and checks the spec'd example scenarios end to end.

use safra_engine::aggregators::Aggregator;
use safra_engine::ingest::{RecordNormalizer, TimeSegmenter};
use safra_engine::operators::Reconciler;
use safra_engine::report::ReportAssembler;
use safra_engine::types::{EquipmentClass, TimeSlice, ValueScale};
use safra_engine::EngineConfig;
use std::path::PathBuf;

const HARVESTER_FILE: &str = "\
Data;Hora;Equipamento;Grupo Equipamento/Frente;Operador;Estado;Grupo Operacao;Operacao;Motor Ligado;RPM Motor;Velocidade;RTK (Piloto Automatico);Esteira Ligada;Pressao de Corte;Field Cruiser
10/05/2025;08:00:00;7041;Frente 1 - BP Ituiutaba;1330450 - Jose Silva;TRABALHANDO;Produtiva;7290 - COLHEITA CANA MECANIZADA;LIGADO;1800;5.2;1;LIGADO;450;1
10/05/2025;08:10:00;7041;Frente 1 - BP Ituiutaba;1330450 - Jose Silva;TRABALHANDO;Produtiva;7290 - COLHEITA CANA MECANIZADA;LIGADO;1850;4.8;1;LIGADO;460;1
10/05/2025;08:50:00;7041;Frente 1 - BP Ituiutaba;00450 - Jose Silva;PARADO;Manutenção;8610 - MANUTENCAO MECANICA;DESLIGADO;0;0;0;DESLIGADO;0;0
10/05/2025;09:00:00;7041;Frente 1 - BP Ituiutaba;00450 - Jose Silva;PARADO;Manutenção;8610 - MANUTENCAO MECANICA;DESLIGADO;0;0;0;DESLIGADO;0;0
10/05/2025;09:10:00;7041;Frente 1 - BP Ituiutaba;9999 - TROCA DE TURNO;PARADO;Perdida;9999 - TROCA DE TURNO;DESLIGADO;0;0;0;DESLIGADO;0;0
";

fn run_pipeline(text: &str) -> Vec<TimeSlice> {
    let config = EngineConfig::default();
    let class = EquipmentClass::Harvester;

    let records = RecordNormalizer::new(class)
        .normalize_bytes(text.as_bytes(), &PathBuf::from("colhedoras.txt"))
        .expect("file should normalize");

    let segmenter = TimeSegmenter::new(
        class,
        config.engine.clone(),
        config.calc_rules.for_class(class).clone(),
    );
    let mut slices = segmenter.segment(&records);

    let reconciler = Reconciler::build(
        &config.operators,
        records.iter().map(|r| r.operator.as_str()),
    );
    reconciler.apply(&mut slices);
    slices
}

#[test]
fn ten_minute_productive_interval_counts_fully() {
    let slices = run_pipeline(HARVESTER_FILE);

    // First interval: 08:00 -> 08:10, productive
    let first = &slices[0];
    assert!(
        (first.duration_h - 0.1667).abs() < 1e-9,
        "10-minute gap should be 0.1667h, got {}",
        first.duration_h
    );
    assert_eq!(first.productive_h, first.duration_h);
}

#[test]
fn forty_minute_gap_is_clamped() {
    let slices = run_pipeline(HARVESTER_FILE);

    // Second interval: 08:10 -> 08:50 exceeds the 0.5h threshold
    assert_eq!(slices[1].duration_h, 0.0);

    // Clamp invariant holds across the batch
    for slice in &slices {
        assert!(slice.duration_h >= 0.0 && slice.duration_h <= 0.5);
    }
}

#[test]
fn duplicate_operator_ids_reconcile_to_short_id() {
    let slices = run_pipeline(HARVESTER_FILE);

    // 1330450 (7 digits, 133 prefix) shares its name with 00450
    assert!(slices
        .iter()
        .all(|s| s.operator != "1330450 - Jose Silva"));
    assert!(slices
        .iter()
        .any(|s| s.operator == "00450 - Jose Silva"));
}

#[test]
fn report_assembles_with_percent_scaling_and_targets() {
    let config = EngineConfig::default();
    let slices = run_pipeline(HARVESTER_FILE);

    let metrics = Aggregator::new(EquipmentClass::Harvester, &config).aggregate(&slices);
    let assembler = ReportAssembler::new(config.reports.clone());
    let meta = assembler.meta("colheita_diario", "2025-05-10", None, "1", None);
    let report = assembler.assemble(meta, metrics);

    // Attributed hours: one productive interval (08:00->08:10) and two
    // maintenance intervals (08:50->09:00, 09:00->09:10); the 40-minute
    // gap was clamped. Availability = 0.1667 / 0.5001 ≈ 33.33%.
    assert_eq!(report.disponibilidade_mecanica.len(), 1);
    let availability = &report.disponibilidade_mecanica[0];
    assert_eq!(availability.availability.scale, ValueScale::Percent);
    assert!(
        (availability.availability.value - 33.33).abs() < 0.1,
        "availability should be ~33.33%, got {}",
        availability.availability.value
    );

    // All ratio sections are in [0, 100] after scaling
    for record in &report.eficiencia_energetica {
        assert!(record.efficiency.value >= 0.0 && record.efficiency.value <= 100.0);
    }
    for record in &report.uso_gps {
        assert!(record.ratio.value >= 0.0 && record.ratio.value <= 100.0);
    }

    // Shift-change placeholder never reaches per-operator sections
    assert!(report
        .eficiencia_energetica
        .iter()
        .all(|r| !r.operator.contains("TROCA DE TURNO")));

    // Targets come from the default registry
    assert_eq!(report.metas.get("disponibilidade_mecanica"), Some(&90.0));
    assert_eq!(report.metas.get("hora_elevador"), Some(&5.0));
}

#[test]
fn idle_hours_partition_engine_on_hours() {
    let config = EngineConfig::default();
    let slices = run_pipeline(HARVESTER_FILE);
    let metrics = Aggregator::new(EquipmentClass::Harvester, &config).aggregate(&slices);

    for record in &metrics.idle {
        let non_idle = record.engine_on_h - record.idle_h;
        assert!(
            (record.idle_h + non_idle - record.engine_on_h).abs() < 1e-6,
            "idle + non-idle must equal engine-on for {}",
            record.operator
        );
        assert!(record.ratio.value >= 0.0 && record.ratio.value <= 1.0);
    }
}

#[test]
fn header_only_file_produces_empty_report() {
    let header = "Data;Hora;Equipamento;Grupo Equipamento/Frente;Operador;Grupo Operacao\n";
    let slices = run_pipeline(header);
    assert!(slices.is_empty());

    let config = EngineConfig::default();
    let metrics = Aggregator::new(EquipmentClass::Harvester, &config).aggregate(&slices);
    assert!(metrics.availability.is_empty());
    assert!(metrics.efficiency.is_empty());
    assert!(metrics.hours.is_empty());
}

#[test]
fn reconciliation_is_idempotent_over_totals() {
    let config = EngineConfig::default();
    let class = EquipmentClass::Harvester;
    let records = RecordNormalizer::new(class)
        .normalize_bytes(HARVESTER_FILE.as_bytes(), &PathBuf::from("colhedoras.txt"))
        .unwrap();
    let segmenter = TimeSegmenter::new(
        class,
        config.engine.clone(),
        config.calc_rules.for_class(class).clone(),
    );
    let mut slices = segmenter.segment(&records);

    let reconciler = Reconciler::build(
        &config.operators,
        records.iter().map(|r| r.operator.as_str()),
    );
    reconciler.apply(&mut slices);
    let once = Aggregator::new(class, &config).aggregate(&slices);

    reconciler.apply(&mut slices);
    let twice = Aggregator::new(class, &config).aggregate(&slices);

    assert_eq!(once.efficiency.len(), twice.efficiency.len());
    for (a, b) in once.efficiency.iter().zip(twice.efficiency.iter()) {
        assert_eq!(a.operator, b.operator);
        assert_eq!(a.efficiency.value, b.efficiency.value);
    }
}
