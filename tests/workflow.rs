use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use indicatif::ProgressBar;
use ramp_daily_clicks::workflow::{run_global, run_per_repository, write_repository};
use ramp_daily_clicks::{
    process_global_daily_clicks, DataKind, FixedLocator, GlobLocator, RampConfig, RampError,
    RampWorkflow, Value,
};
use tempfile::TempDir;
use zip::write::FileOptions;
use zip::CompressionMethod;

const V1_HEADER: &str = "citableContent,clickThrough,clicks,country,date,device,impressions,index,position,url,repository_id";
const PC_HEADER: &str =
    "citableContent,clickThrough,clicks,date,impressions,index,position,url,repository_id";
const AI_HEADER: &str =
    "clickThrough,clicks,country,date,device,impressions,index,position,repository_id";

fn write_zip(dir: &Path, name: &str, csv: &str) -> PathBuf {
    fs::create_dir_all(dir).unwrap();
    let path = dir.join(name);
    let mut zip = zip::ZipWriter::new(File::create(&path).unwrap());
    let options: FileOptions<'_, ()> =
        FileOptions::default().compression_method(CompressionMethod::Deflated);
    zip.start_file(name.replace(".zip", ".csv"), options).unwrap();
    zip.write_all(csv.as_bytes()).unwrap();
    zip.finish().unwrap();
    path
}

/// Two v1 months, one v2 month, laid out as `<root>/<month>/<month>_<suffix>`.
fn ramp_tree(root: &Path) {
    write_zip(
        &root.join("2018-01"),
        "2018-01_all.zip",
        &format!(
            "{V1_HEADER}\n\
             True,0,5,USA,2018-01-01,Desktop,10,0,1.0,http://r1/a,r1\n\
             True,1,9,USA,2018-01-01,Mobile,10,1,2.0,http://r2/a,r2\n"
        ),
    );
    write_zip(
        &root.join("2018-02"),
        "2018-02_all.zip",
        &format!(
            "{V1_HEADER}\n\
             False,0,3,CAN,2018-01-02,Mobile,7,0,4.5,http://r1/b,r1\n"
        ),
    );
    write_zip(
        &root.join("2018-09"),
        "2018-09_all_page-clicks.zip",
        &format!(
            "{PC_HEADER}\n\
             True,0,7,2018-08-20,20,0,1.0,http://r1/a,r1\n\
             True,0,1,2018-08-20,20,1,1.0,http://r2/a,r2\n"
        ),
    );
    write_zip(
        &root.join("2018-09"),
        "2018-09_all_country-device-info.zip",
        &format!(
            "{AI_HEADER}\n\
             0,4,USA,2018-08-20,Desktop,12,0,1.0,r1\n\
             0,3,USA,2018-08-20,Desktop,12,1,1.0,r1\n\
             0,1,FRA,2018-08-20,Tablet,3,2,1.0,r2\n"
        ),
    );
}

fn config_for(root: &TempDir) -> RampConfig {
    RampConfig {
        data_root: root.path().join("ramp_zipped"),
        output_dir: root.path().join("out"),
        repository_info: root.path().join("RAMP_repository_info.csv"),
        ..RampConfig::default()
    }
}

#[test]
fn repository_daily_page_clicks_span_both_eras() {
    let root = TempDir::new().unwrap();
    let config = config_for(&root);
    ramp_tree(&config.data_root);
    let workflow = RampWorkflow::new(GlobLocator::new(config));

    let daily = workflow.process_repo_day_clicks("r1").unwrap();
    assert_eq!(
        daily.page_clicks.rows(),
        &[
            vec![Value::from("2018-01-01"), Value::Int(5), Value::from("r1")],
            vec![Value::from("2018-01-02"), Value::Int(3), Value::from("r1")],
            vec![Value::from("2018-08-20"), Value::Int(7), Value::from("r1")],
        ]
    );
    assert_eq!(
        daily.access_info.columns(),
        &["date", "country", "device", "clicks", "repository_id"]
    );
    assert_eq!(
        daily.access_info.rows().last().unwrap(),
        &vec![
            Value::from("2018-08-20"),
            Value::from("USA"),
            Value::from("Desktop"),
            Value::Int(7),
            Value::from("r1"),
        ]
    );
}

#[test]
fn full_repository_tables_have_v2_schema() {
    let root = TempDir::new().unwrap();
    let config = config_for(&root);
    ramp_tree(&config.data_root);
    let workflow = RampWorkflow::new(GlobLocator::new(config));

    let full = workflow.process_repo("r1").unwrap();
    assert_eq!(full.page_clicks.columns(), &DataKind::PageClick.column_names()[..]);
    assert_eq!(full.page_clicks.len(), 2 + 1);
    assert_eq!(full.access_info.columns(), &DataKind::CountryDevice.column_names()[..]);
    assert_eq!(full.access_info.len(), 2 + 2);
}

#[test]
fn global_run_writes_both_files() {
    let root = TempDir::new().unwrap();
    let config = config_for(&root);
    ramp_tree(&config.data_root);
    let workflow = RampWorkflow::new(GlobLocator::new(config.clone()));

    run_global(&workflow, &config).unwrap();

    let pc = fs::read_to_string(config.output_dir.join("RAMP_complete_daily_pc_clicks.csv")).unwrap();
    assert_eq!(
        pc,
        "date,clicks\n2018-01-01,14\n2018-01-02,3\n2018-08-20,8\n"
    );
    let ai = fs::read_to_string(config.output_dir.join("RAMP_complete_daily_ai_clicks.csv")).unwrap();
    assert_eq!(
        ai,
        "date,country,device,clicks\n\
         2018-01-01,USA,Desktop,5\n\
         2018-01-01,USA,Mobile,9\n\
         2018-01-02,CAN,Mobile,3\n\
         2018-08-20,FRA,Tablet,1\n\
         2018-08-20,USA,Desktop,7\n"
    );
}

#[test]
fn per_repository_run_writes_two_files_each() {
    let root = TempDir::new().unwrap();
    let config = config_for(&root);
    ramp_tree(&config.data_root);
    fs::write(&config.repository_info, "repository_id\nr2\nr1\nr3\n").unwrap();
    let workflow = RampWorkflow::new(GlobLocator::new(config.clone()));

    let processed = run_per_repository(&workflow, &config, &ProgressBar::hidden()).unwrap();
    assert_eq!(processed, 3);

    let dir = config.daily_output_dir();
    let r2 = fs::read_to_string(dir.join("r2_RAMP_pc_daily_clicks.csv")).unwrap();
    assert_eq!(r2, "date,clicks,repository_id\n2018-01-01,9,r2\n2018-08-20,1,r2\n");
    // a repository without rows still gets header-only files
    let r3 = fs::read_to_string(dir.join("r3_RAMP_ai_daily_clicks.csv")).unwrap();
    assert_eq!(r3, "date,country,device,clicks,repository_id\n");
    assert!(dir.join("r1_RAMP_ai_daily_clicks.csv").is_file());
}

#[test]
fn single_repository_full_output() {
    let root = TempDir::new().unwrap();
    let config = config_for(&root);
    ramp_tree(&config.data_root);
    let workflow = RampWorkflow::new(GlobLocator::new(config.clone()));

    let [pc, ai] = write_repository(&workflow, &config, "r2", true).unwrap();
    assert!(pc.ends_with("r2_RAMP_pc_data.csv"));
    let text = fs::read_to_string(ai).unwrap();
    assert!(text.starts_with(
        "clickThrough,clicks,country,date,device,impressions,index,position,repository_id\n"
    ));
    assert_eq!(text.lines().count(), 1 + 2);
    // whole-valued float columns keep their decimal form
    assert!(text.contains("1,9,USA,2018-01-01,Mobile,10,1,2.0,r2\n"), "{text}");
    assert!(text.contains("0,1,FRA,2018-08-20,Tablet,3,2,1.0,r2\n"), "{text}");
}

#[test]
fn global_sums_fold_same_date_from_two_archives() {
    let root = TempDir::new().unwrap();
    let a = write_zip(root.path(), "a.zip", &format!("{PC_HEADER}\nx,0,10,2019-03-01,1,0,1.0,u,r1\n"));
    let b = write_zip(root.path(), "b.zip", &format!("{PC_HEADER}\nx,0,15,2019-03-01,1,0,1.0,u,r9\n"));

    let sums = process_global_daily_clicks(&[], &[a, b], &[]).unwrap();
    assert_eq!(
        sums.page_clicks.rows(),
        &[vec![Value::from("2019-03-01"), Value::Int(25)]]
    );
}

#[test]
fn corrupt_archive_names_kind_and_path() {
    let root = TempDir::new().unwrap();
    let bad = root.path().join("2019-01_all_country-device-info.zip");
    fs::write(&bad, b"PK\x03\x04 truncated").unwrap();
    let workflow = RampWorkflow::new(
        FixedLocator::new().with(DataKind::CountryDevice, vec![bad.clone()]),
    );

    let err = workflow.process_repo("r1").unwrap_err();
    assert!(matches!(err, RampError::Archive { kind: DataKind::CountryDevice, .. }));
    let message = err.to_string();
    assert!(message.contains("country-device"), "{message}");
    assert!(message.contains("2019-01_all_country-device-info.zip"), "{message}");
}
