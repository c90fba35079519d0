use recipe_harvest::pipeline::default_output_prefix;
use recipe_harvest::{process_file, ErrorPolicy, HarvestError, ProcessOptions};
use std::fs;
use std::path::Path;

const RECIPES: &str = r#"{"url": "https://www.chefkoch.de/rezepte/745721177147257/Spaghetti-Carbonara.html", "url_fingerprint": "3f0a", "name": "Spaghetti Carbonara", "portions": "4", "ingredients": [{"section": null, "amount": "500 g", "name": "Spaghetti", "url": null}, {"section": null, "amount": "1 ½ EL", "name": "Olivenöl", "url": null}, {"section": null, "amount": "etwas", "name": "Pfeffer", "url": "https://www.chefkoch.de/rezepte/was-koche-ich-mit/pfeffer"}], "preparation": ["Nudeln kochen.", "Speck anbraten, \"knusprig\"."], "durations": {"Arbeitszeit": "ca. 15 Minuten", "Gesamtzeit": "ca. 25 Minuten"}, "tags": ["Hauptspeise", "Nudeln", "Schnell"]}
{"url": "https://www.chefkoch.de/rezepte/1234/Pfannkuchen.html", "name": "Pfannkuchen", "ingredients": [{"section": "Teig", "amount": "0,5 l", "name": "Milch", "url": null}, {"section": "Teig", "amount": "¼", "name": "Zitrone", "url": null}], "preparation": ["Alles verrühren."]}
"#;

fn write_input(dir: &Path, contents: &str) -> std::path::PathBuf {
    let input = dir.join("chefkoch.jsonl");
    fs::write(&input, contents).unwrap();
    input
}

fn read(prefix: &str, suffix: &str) -> String {
    fs::read_to_string(format!("{}{}", prefix, suffix)).unwrap()
}

#[test]
fn test_process_file_writes_three_csv_files() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), RECIPES);
    let prefix = default_output_prefix(&input);

    let options = ProcessOptions {
        split_amounts: true,
        normalize_values: true,
        ..Default::default()
    };
    let summary = process_file(&input, &prefix, &options).unwrap();
    assert_eq!(summary.recipes, 2);
    assert_eq!(summary.ingredients, 5);
    assert_eq!(summary.steps, 3);

    let recipes = read(&prefix, ".csv");
    let lines: Vec<&str> = recipes.lines().collect();
    assert_eq!(
        lines[0],
        "id,url,url_fingerprint,name,image_url,description,preparation_time,difficulty,date,rating_avg,rating_count,comment_count,author_name,author_url,portions,durations,tags"
    );
    assert_eq!(
        lines[1],
        "745721177147257,https://www.chefkoch.de/rezepte/745721177147257/Spaghetti-Carbonara.html,3f0a,Spaghetti Carbonara,,,,,,,,,,,4,Arbeitszeit: ca. 15 Minuten | Gesamtzeit: ca. 25 Minuten,Hauptspeise | Nudeln | Schnell"
    );
    // absent durations and tags stay empty
    assert!(lines[2].starts_with("1234,"));
    assert!(lines[2].ends_with(",,"));

    let ingredients = read(&prefix, ".ingredients.csv");
    assert_eq!(
        ingredients.lines().collect::<Vec<_>>(),
        vec![
            "recipe_id,index,section,name,url,amount,value,unit",
            "745721177147257,1,,Spaghetti,,500 g,500,g",
            "745721177147257,2,,Olivenöl,,1 ½ EL,1.5,EL",
            "745721177147257,3,,Pfeffer,https://www.chefkoch.de/rezepte/was-koche-ich-mit/pfeffer,etwas,,etwas",
            "1234,1,Teig,Milch,,\"0,5 l\",0.5,l",
            "1234,2,Teig,Zitrone,,¼,0.25,",
        ]
    );

    let preparation = read(&prefix, ".preparation.csv");
    assert_eq!(
        preparation.lines().collect::<Vec<_>>(),
        vec![
            "recipe_id,index,text",
            "745721177147257,1,Nudeln kochen.",
            "745721177147257,2,\"Speck anbraten, \"\"knusprig\"\".\"",
            "1234,1,Alles verrühren.",
        ]
    );
}

#[test]
fn test_split_without_normalize_keeps_tokens() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), RECIPES);
    let prefix = dir.path().join("out").to_string_lossy().into_owned();

    let options = ProcessOptions {
        split_amounts: true,
        ..Default::default()
    };
    process_file(&input, &prefix, &options).unwrap();

    let ingredients = read(&prefix, ".ingredients.csv");
    assert!(ingredients.contains("745721177147257,2,,Olivenöl,,1 ½ EL,1 ½,EL"));
    assert!(ingredients.contains("1234,1,Teig,Milch,,\"0,5 l\",\"0,5\",l"));
}

#[test]
fn test_malformed_record_aborts_run() {
    let dir = tempfile::tempdir().unwrap();
    let contents = format!("{}{}\n", RECIPES, r#"{"url": "https://www.chefkoch.de/magazin/artikel.html"}"#);
    let input = write_input(dir.path(), &contents);
    let prefix = default_output_prefix(&input);

    let err = process_file(&input, &prefix, &ProcessOptions::default()).unwrap_err();
    assert!(matches!(err, HarvestError::MalformedInput { .. }));

    let options = ProcessOptions {
        error_policy: ErrorPolicy::Skip,
        ..Default::default()
    };
    let summary = process_file(&input, &prefix, &options).unwrap();
    assert_eq!(summary.recipes, 2);
    assert_eq!(summary.skipped, 1);
}

#[test]
fn test_missing_input_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.jsonl");
    let prefix = default_output_prefix(&missing);
    let err = process_file(&missing, &prefix, &ProcessOptions::default()).unwrap_err();
    assert!(matches!(err, HarvestError::Io(_)));
}
