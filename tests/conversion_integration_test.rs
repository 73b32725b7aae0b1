use anyhow::Result;
use calamine::{DataType, Reader, Xlsx};
use order_bridge::config::toml_config::{ConversionConfig, ResolvedConfig};
use order_bridge::{
    ConversionJob, ConversionPipeline, EtlEngine, EtlError, FilterMode, LocalStorage, Target,
};
use std::io::Read;
use tempfile::TempDir;

const EXPORT: &str = "\
Name,Email,Financial Status,Lineitem quantity,Lineitem sku,Shipping Name,Shipping Address1,Shipping Address2,Shipping City,Shipping Zip,Shipping Province,Shipping Country,Shipping Phone,Risk Level
#1001,jane@example.com,paid,1,playpen-mat-balls-blue,Jane Doe,12 Main St,,Fontana,92335,CA,US,(909) 555-0100,Low
#1002,sam@example.com,paid,1,elite-play-mat,Sam Roe,PO Box 12,,Boston,2134,MA,US,1-617-555-0101,Medium
#1003,kim@example.com,refunded,1,playpen-red,Kim Poe,9 Oak Rd,,Austin,73301,TX,US,512 555 0102,Low
#1004,lee@example.com,paid,2,playpen-red,Lee Moe,1 Elm St,Unit 4,Denver,80201,CO,US,303-555-0103,Low
";

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new(export: &str) -> Result<Self> {
        let dir = TempDir::new()?;
        std::fs::write(dir.path().join("orders.csv"), export)?;
        Ok(Self { dir })
    }

    fn path(&self, name: &str) -> String {
        self.dir.path().join(name).to_string_lossy().into_owned()
    }

    fn engine(
        &self,
        target: Target,
        mode: FilterMode,
        template: Option<String>,
    ) -> Result<EtlEngine<ConversionPipeline<LocalStorage, ResolvedConfig>>> {
        let config = ConversionConfig::from_toml_str(&format!(
            "[load]\noutput_path = \"{}\"\nfilename_pattern = \"{{target}}_test\"\n",
            self.path("out").replace('\\', "/")
        ))?;
        let job = ConversionJob {
            orders: self.path("orders.csv"),
            target,
            mode,
            template,
        };
        let pipeline =
            ConversionPipeline::new(LocalStorage::new(".".to_string()), ResolvedConfig::new(config), job);
        Ok(EtlEngine::new(pipeline))
    }
}

fn cell(range: &calamine::Range<DataType>, row: u32, col: u32) -> String {
    match range.get_value((row, col)) {
        Some(DataType::String(value)) => value.clone(),
        Some(DataType::Empty) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

#[tokio::test]
async fn test_jd_end_to_end() -> Result<()> {
    let fixture = Fixture::new(EXPORT)?;
    let engine = fixture.engine(Target::Jd, FilterMode::None, None)?;

    let output_path = engine.run().await?;
    assert!(output_path.ends_with("jd_test.xlsx"));

    let mut workbook: Xlsx<_> = calamine::open_workbook(&output_path)?;
    let orders = workbook
        .worksheet_range("Outbound Order Info")
        .expect("order sheet")?;

    // group headers + column names + three paid lines
    assert_eq!(orders.height(), 5);
    assert_eq!(cell(&orders, 1, 1), "*Customer Order No.");
    assert_eq!(cell(&orders, 2, 1), "#1001");
    assert_eq!(cell(&orders, 2, 16), "playpen-mat-balls-blue");
    // JD keeps the zip as exported
    assert_eq!(cell(&orders, 3, 12), "2134");
    assert_eq!(cell(&orders, 3, 15), "6175550101");
    assert_eq!(cell(&orders, 4, 1), "#1004");

    let services = workbook
        .worksheet_range("Service Product Info")
        .expect("service sheet")?;
    assert_eq!(cell(&services, 1, 2), "Service Product Code");
    let codes: Vec<(String, String)> = (2..services.height() as u32)
        .map(|row| (cell(&services, row, 1), cell(&services, row, 2)))
        .collect();
    assert_eq!(
        codes,
        vec![
            ("#1001".to_string(), "SPB9900he".to_string()),
            ("#1002".to_string(), "SPB9900hf".to_string()),
            ("#1004".to_string(), "SPB9900he".to_string()),
        ]
    );
    assert_eq!(cell(&services, 2, 0), "KH20000001629");

    Ok(())
}

#[tokio::test]
async fn test_verde_mats_end_to_end() -> Result<()> {
    let fixture = Fixture::new(EXPORT)?;
    let engine = fixture.engine(Target::Verde, FilterMode::Mats, None)?;

    let output_path = engine.run().await?;
    assert!(output_path.ends_with("verde_test.txt"));

    let output = std::fs::read_to_string(&output_path)?;
    let rows: Vec<Vec<&str>> = output.lines().map(|l| l.split('\t').collect()).collect();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0][0], "#1001");
    assert_eq!(rows[0][12], "elite-play-mat-v2");
    assert_eq!(rows[1][0], "#1002");
    assert_eq!(rows[1][8], "02134");
    assert_eq!(rows[1][10], "6175550101");

    Ok(())
}

#[tokio::test]
async fn test_advisories_do_not_change_output() -> Result<()> {
    let fixture = Fixture::new(EXPORT)?;
    let engine = fixture.engine(Target::Jd, FilterMode::None, None)?;

    let conversion = engine.preview().await?;
    let kinds: Vec<String> = conversion
        .advisories
        .iter()
        .map(|a| serde_json::to_value(a).map(|v| v["kind"].as_str().unwrap_or_default().to_string()))
        .collect::<std::result::Result<_, _>>()?;

    assert!(kinds.contains(&"risk_level".to_string()));
    assert!(kinds.contains(&"po_box".to_string()));
    assert!(kinds.contains(&"quantity_above_one".to_string()));
    assert_eq!(conversion.rows.len(), 3);

    Ok(())
}

#[tokio::test]
async fn test_unexpected_combination_writes_nothing() -> Result<()> {
    let export = "\
Name,Financial Status,Lineitem quantity,Lineitem sku
#2001,paid,1,widget-a
#2001,paid,1,widget-b
";
    let fixture = Fixture::new(export)?;
    let engine = fixture.engine(Target::Jd, FilterMode::None, None)?;

    match engine.run().await {
        Err(EtlError::UnexpectedItemCombination { order_id, items }) => {
            assert_eq!(order_id, "#2001");
            assert_eq!(items, vec!["widget-a", "widget-b"]);
        }
        other => panic!("expected a classification failure, got {:?}", other),
    }
    assert!(!std::path::Path::new(&fixture.path("out")).exists());

    Ok(())
}

#[tokio::test]
async fn test_template_sets_column_order() -> Result<()> {
    let fixture = Fixture::new(EXPORT)?;

    let mut template = rust_xlsxwriter::Workbook::new();
    let sheet = template.add_worksheet();
    sheet.write_string(0, 0, "Order Import Template")?;
    for (col, name) in ["SKU", "Quantity", "PurchaseOrderNumber", "ReferenceNumber"]
        .iter()
        .enumerate()
    {
        sheet.write_string(1, col as u16, *name)?;
    }
    template.save(fixture.path("verde_template.xlsx"))?;

    let engine = fixture.engine(
        Target::Verde,
        FilterMode::Accessories,
        Some(fixture.path("verde_template.xlsx")),
    )?;
    let output_path = engine.run().await?;

    let output = std::fs::read_to_string(&output_path)?;
    let rows: Vec<Vec<&str>> = output.lines().map(|l| l.split('\t').collect()).collect();

    assert_eq!(rows.len(), 3);
    assert_eq!(&rows[0][..4], &["elite-play-mat-v2", "1", "", "#1001"]);
    assert_eq!(&rows[1][..4], &["pitballs-100", "1", "", "#1001"]);
    assert_eq!(&rows[2][..4], &["elite-play-mat-v2", "1", "", "#1002"]);

    Ok(())
}

#[tokio::test]
async fn test_verde_template_gap_stays_an_empty_column() -> Result<()> {
    let fixture = Fixture::new(EXPORT)?;

    let mut template = rust_xlsxwriter::Workbook::new();
    let sheet = template.add_worksheet();
    sheet.write_string(1, 0, "ReferenceNumber")?;
    sheet.write_string(1, 2, "SKU")?;
    template.save(fixture.path("verde_gap.xlsx"))?;

    let engine = fixture.engine(
        Target::Verde,
        FilterMode::Mats,
        Some(fixture.path("verde_gap.xlsx")),
    )?;
    let output = std::fs::read_to_string(engine.run().await?)?;
    let rows: Vec<Vec<&str>> = output.lines().map(|l| l.split('\t').collect()).collect();

    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[0][..4], &["#1001", "", "elite-play-mat-v2", "RateShop"]);
    assert_eq!(&rows[1][..3], &["#1002", "", "elite-play-mat-v2"]);

    Ok(())
}

#[tokio::test]
async fn test_jd_template_keeps_group_headers() -> Result<()> {
    let fixture = Fixture::new(EXPORT)?;

    let mut template = rust_xlsxwriter::Workbook::new();
    let sheet = template.add_worksheet();
    sheet.set_name("Outbound Order Info")?;
    let format = rust_xlsxwriter::Format::new();
    sheet.merge_range(0, 0, 0, 1, "Outbound Order Info", &format)?;
    sheet.merge_range(0, 2, 0, 3, "Product Info", &format)?;
    sheet.write_string(1, 0, "*Customer Order No.")?;
    sheet.write_string(1, 2, "*Customer SKU ID")?;
    sheet.write_string(1, 3, "*Quantity")?;
    template.save(fixture.path("jd_template.xlsx"))?;

    let engine = fixture.engine(
        Target::Jd,
        FilterMode::None,
        Some(fixture.path("jd_template.xlsx")),
    )?;
    let output_path = engine.run().await?;

    let mut workbook: Xlsx<_> = calamine::open_workbook(&output_path)?;
    let orders = workbook
        .worksheet_range("Outbound Order Info")
        .expect("order sheet")?;

    assert_eq!(cell(&orders, 0, 0), "Outbound Order Info");
    assert_eq!(cell(&orders, 0, 1), "Product Info");
    // the empty template column is dropped
    assert_eq!(cell(&orders, 1, 0), "*Customer Order No.");
    assert_eq!(cell(&orders, 1, 1), "*Customer SKU ID");
    assert_eq!(cell(&orders, 1, 2), "*Quantity");
    assert_eq!(cell(&orders, 2, 0), "#1001");
    assert_eq!(cell(&orders, 2, 1), "playpen-mat-balls-blue");
    assert_eq!(orders.get_value((2, 2)), Some(&DataType::Float(1.0)));
    assert_eq!(cell(&orders, 1, 3), "*Customer Code");

    // the template has no service sheet, so the built-in one is written
    let services = workbook
        .worksheet_range("Service Product Info")
        .expect("service sheet")?;
    assert_eq!(cell(&services, 0, 0), "Outbound Order Info");
    assert_eq!(cell(&services, 0, 2), "Service Product Info");
    assert_eq!(cell(&services, 2, 2), "SPB9900he");

    Ok(())
}

#[tokio::test]
async fn test_bundle_summary_lists_services() -> Result<()> {
    let fixture = Fixture::new(EXPORT)?;
    let config = ConversionConfig::from_toml_str(&format!(
        "[load]\noutput_path = \"{}\"\n\n[load.compression]\nenabled = true\nfilename = \"jd.zip\"\n",
        fixture.path("out").replace('\\', "/")
    ))?;
    let job = ConversionJob {
        orders: fixture.path("orders.csv"),
        target: Target::Jd,
        mode: FilterMode::Playpens,
        template: None,
    };
    let engine = EtlEngine::new(ConversionPipeline::new(
        LocalStorage::new(".".to_string()),
        ResolvedConfig::new(config),
        job,
    ));

    let output_path = engine.run().await?;
    let mut archive = zip::ZipArchive::new(std::fs::File::open(&output_path)?)?;

    let mut json = String::new();
    archive.by_name("summary.json")?.read_to_string(&mut json)?;
    let summary: serde_json::Value = serde_json::from_str(&json)?;

    assert_eq!(summary["target"], "jd");
    assert_eq!(summary["filter"], "playpens");
    assert_eq!(summary["services"][0]["order_id"], "#1001");
    assert_eq!(summary["services"][0]["code"], "SPB9900he");
    assert_eq!(summary["stats"]["lines_unpaid"], 1);

    Ok(())
}
