use std::{collections::BTreeMap, path::Path};

use quote::{format_ident, quote};

/// Turns a file or directory name into something usable as an identifier.
fn ident_part(name: &str) -> String {
    name.trim_end_matches(".lox").replace(['-', '.', ' '], "_")
}

/// Expands to one module per directory below `bin/tests/suite`, holding a
/// `#[test]` per `.lox` file that hands the embedded source to `lox_expect`.
/// The sources are pulled in with `include_str!`, so editing a suite file
/// rebuilds the tests.
#[proc_macro]
pub fn generate_tests(_: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let root_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../suite");

    let mut suites: BTreeMap<String, Vec<_>> = BTreeMap::new();
    for entry in walkdir::WalkDir::new(&root_dir).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let message = format!("Can't read test suite: {e}");
                return quote!(compile_error!(#message);).into();
            }
        };
        if entry.path().extension() != Some("lox".as_ref()) {
            continue;
        }

        let Ok(relative) = entry.path().strip_prefix(&root_dir) else { continue };
        let suite = relative
            .parent()
            .map(|dir| dir.iter().map(|part| ident_part(&part.to_string_lossy())).collect::<Vec<_>>().join("_"))
            .filter(|suite| !suite.is_empty())
            .unwrap_or_else(|| "toplevel".to_string());

        let test_ident = format_ident!("{}", ident_part(&entry.file_name().to_string_lossy()));
        let path = entry.path().to_string_lossy().into_owned();
        suites.entry(suite).or_default().push(quote! {
            #[test]
            fn #test_ident() {
                lox_expect(include_str!(#path));
            }
        });
    }

    if suites.is_empty() {
        let message = format!("No .lox files found below {}", root_dir.display());
        return quote!(compile_error!(#message);).into();
    }

    let modules = suites.into_iter().map(|(suite, tests)| {
        let suite = format_ident!("{}", suite);
        quote! {
            mod #suite {
                use super::lox_expect;

                #(#tests)*
            }
        }
    });

    quote! {
        #[ctor::ctor]
        fn init() {
            env_logger::init();
        }

        #(#modules)*
    }
    .into()
}
