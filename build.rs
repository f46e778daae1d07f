//! # Build Script for the Report Vocabulary / 报告词汇表构建脚本
//!
//! This build script generates the closed vocabulary surface of the reporter
//! from the TOML locale files in `locales/`. The base language file (`en.toml`)
//! defines the set of keys; every other locale is compiled into a lookup table
//! over the same keys so that completeness can be verified when a locale is
//! selected.
//!
//! 此构建脚本从 `locales/` 中的 TOML 区域文件生成报告器的封闭词汇表。
//! 基础语言文件（`en.toml`）定义键集合；其他区域都编译为相同键上的查找表，
//! 以便在选择区域时验证完整性。
//!
//! ## Generated Code / 生成的代码
//!
//! - `VocabKey` enum with one variant per flattened key (`summary.failures`
//!   becomes `VocabKey::SummaryFailures`)
//! - `AVAILABLE_LOCALES` with every locale file found
//! - `lookup()` returning `None` for keys a locale does not define

use serde::Deserialize;
use std::collections::BTreeMap;
use std::env;
use std::fmt::Write;
use std::fs;
use std::path::{Path, PathBuf};

/// Represents the structure of a locale file: nested tables of strings.
#[derive(Debug, Deserialize)]
struct Translations(BTreeMap<String, toml::Value>);

impl Translations {
    /// Flattens nested tables into dotted keys.
    fn flatten(self) -> BTreeMap<String, String> {
        let mut flat = BTreeMap::new();
        for (key, value) in self.0 {
            flatten_into(&mut flat, key, value);
        }
        flat
    }
}

fn flatten_into(flat: &mut BTreeMap<String, String>, prefix: String, value: toml::Value) {
    match value {
        toml::Value::Table(table) => {
            for (key, nested) in table {
                flatten_into(flat, format!("{}.{}", prefix, key), nested);
            }
        }
        toml::Value::String(s) => {
            flat.insert(prefix, s);
        }
        other => {
            println!(
                "cargo:warning=Non-string value for '{}' ignored: {}",
                prefix, other
            );
        }
    }
}

/// Converts a dotted snake_case key to PascalCase.
///
/// # Examples
/// ```
/// assert_eq!(to_pascal_case("summary.errors_setup"), "SummaryErrorsSetup");
/// ```
fn to_pascal_case(s: &str) -> String {
    let mut pascal = String::with_capacity(s.len());
    let mut capitalize = true;

    for c in s.chars() {
        if c == '_' || c == '.' {
            capitalize = true;
        } else if capitalize {
            pascal.push(c.to_ascii_uppercase());
            capitalize = false;
        } else {
            pascal.push(c);
        }
    }

    pascal
}

fn read_locale(path: &Path) -> std::io::Result<BTreeMap<String, String>> {
    let content = fs::read_to_string(path)?;
    let translations: Translations = toml::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse {:?}: {}", path, e));
    Ok(translations.flatten())
}

/// Main build script function that generates the vocabulary code.
///
/// # Process
/// 1. Read all .toml files from the locales directory
/// 2. Parse the base language file (en.toml) to extract all keys
/// 3. Generate an enum with all vocabulary keys
/// 4. Generate a lookup function for each locale
/// 5. Write the generated code to the output directory
fn main() -> std::io::Result<()> {
    let out_dir = env::var("OUT_DIR").expect("OUT_DIR not set");
    let dest_path = Path::new(&out_dir).join("vocabulary.rs");

    let locales_dir = Path::new("locales");

    // 1. Collect locale files in a stable order.
    let mut lang_files: Vec<PathBuf> = fs::read_dir(locales_dir)?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("toml"))
        .collect();
    lang_files.sort();

    // 2. The base locale defines the key set.
    let base = read_locale(&locales_dir.join("en.toml"))?;
    let pascal_case_keys: BTreeMap<_, _> = base
        .keys()
        .map(|key| (key.clone(), to_pascal_case(key)))
        .collect();

    let mut final_code = String::new();

    // 3. Key enum.
    writeln!(
        &mut final_code,
        "/// Every vocabulary entry a locale must provide.\n#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]\npub enum VocabKey {{"
    )
    .unwrap();
    for pascal_name in pascal_case_keys.values() {
        writeln!(&mut final_code, "    {},", pascal_name).unwrap();
    }
    writeln!(&mut final_code, "}}\n").unwrap();

    writeln!(&mut final_code, "impl VocabKey {{").unwrap();
    writeln!(&mut final_code, "    /// All keys, in the order of the base locale.").unwrap();
    writeln!(&mut final_code, "    pub const ALL: &'static [VocabKey] = &[").unwrap();
    for pascal_name in pascal_case_keys.values() {
        writeln!(&mut final_code, "        VocabKey::{},", pascal_name).unwrap();
    }
    writeln!(&mut final_code, "    ];\n").unwrap();
    writeln!(&mut final_code, "    /// The dotted key as written in the locale files.").unwrap();
    writeln!(&mut final_code, "    pub fn as_str(self) -> &'static str {{").unwrap();
    writeln!(&mut final_code, "        match self {{").unwrap();
    for (key, pascal_name) in &pascal_case_keys {
        writeln!(&mut final_code, "            VocabKey::{} => {:?},", pascal_name, key).unwrap();
    }
    writeln!(&mut final_code, "        }}\n    }}\n}}\n").unwrap();

    // 4. One lookup table per locale.
    let mut lang_codes_for_dispatch = Vec::new();

    for path in &lang_files {
        let lang_code_raw = path.file_stem().unwrap().to_str().unwrap();
        let fn_lang_code = lang_code_raw.replace('-', "_").to_lowercase();
        lang_codes_for_dispatch.push((lang_code_raw.to_string(), fn_lang_code.clone()));

        let translations = read_locale(path)?;

        writeln!(&mut final_code, "#[allow(unreachable_patterns)]").unwrap();
        writeln!(
            &mut final_code,
            "fn lookup_{}(key: VocabKey) -> Option<&'static str> {{",
            fn_lang_code
        )
        .unwrap();
        writeln!(&mut final_code, "    match key {{").unwrap();
        for (key, value) in &translations {
            if let Some(pascal_key) = pascal_case_keys.get(key) {
                writeln!(
                    &mut final_code,
                    "        VocabKey::{} => Some({:?}),",
                    pascal_key, value
                )
                .unwrap();
            } else {
                println!(
                    "cargo:warning=Key '{}' in {:?} not found in base (en.toml).",
                    key, path
                );
            }
        }
        writeln!(&mut final_code, "        _ => None,\n    }}\n}}\n").unwrap();
    }

    // 5. Locale list and dispatch.
    let locale_list = lang_codes_for_dispatch
        .iter()
        .map(|(raw, _)| format!("{:?}", raw))
        .collect::<Vec<_>>()
        .join(", ");
    writeln!(
        &mut final_code,
        "/// Every locale compiled into the binary.\npub const AVAILABLE_LOCALES: &[&str] = &[{}];\n",
        locale_list
    )
    .unwrap();

    writeln!(
        &mut final_code,
        "/// Looks up `key` in `lang`; `None` when the locale or the entry is missing.\npub fn lookup(lang: &str, key: VocabKey) -> Option<&'static str> {{"
    )
    .unwrap();
    writeln!(&mut final_code, "    match lang {{").unwrap();
    for (raw_code, fn_code) in lang_codes_for_dispatch {
        writeln!(
            &mut final_code,
            "        {:?} => lookup_{}(key),",
            raw_code, fn_code
        )
        .unwrap();
    }
    writeln!(&mut final_code, "        _ => None,\n    }}\n}}").unwrap();

    fs::write(&dest_path, final_code)?;
    println!("cargo:rerun-if-changed=locales/");

    Ok(())
}
