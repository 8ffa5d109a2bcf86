use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, spanned::Spanned, Data, DeriveInput, Fields, LitStr, Type};

/// Derive macro describing the CSV columns of an input record.
///
/// Each named field becomes one column:
/// - name: the field name, or `#[serde(rename = "...")]`
/// - required: false for `Option<T>` fields and fields marked `#[serde(default)]`
/// - description: the field's doc comment
///
/// Generates `fn csv_schema() -> &'static [CsvField]`; a `CsvField` struct with
/// `name`, `required` and `description` fields must be in scope.
#[proc_macro_derive(CsvSchema, attributes(serde))]
pub fn derive_csv_schema(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

struct Column {
    name: String,
    required: bool,
    description: String,
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            other => {
                return Err(syn::Error::new(
                    other.span(),
                    "CsvSchema requires named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new(
                input.ident.span(),
                "CsvSchema can only be derived for structs",
            ))
        }
    };

    let mut columns = Vec::with_capacity(fields.len());
    for field in fields {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let serde = SerdeField::parse(&field.attrs)?;
        columns.push(Column {
            name: serde.rename.unwrap_or_else(|| ident.to_string()),
            required: !serde.default && !is_option(&field.ty),
            description: doc_comment(&field.attrs),
        });
    }

    let entries = columns.iter().map(|column| {
        let Column {
            name,
            required,
            description,
        } = column;
        quote! {
            CsvField {
                name: #name,
                required: #required,
                description: #description,
            }
        }
    });

    let name = &input.ident;
    Ok(quote! {
        impl #name {
            pub fn csv_schema() -> &'static [CsvField] {
                static COLUMNS: &[CsvField] = &[#(#entries),*];
                COLUMNS
            }
        }
    })
}

#[derive(Default)]
struct SerdeField {
    rename: Option<String>,
    default: bool,
}

impl SerdeField {
    fn parse(attrs: &[syn::Attribute]) -> syn::Result<Self> {
        let mut parsed = SerdeField::default();
        for attr in attrs.iter().filter(|a| a.path().is_ident("serde")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    let value: LitStr = meta.value()?.parse()?;
                    parsed.rename = Some(value.value());
                } else if meta.path.is_ident("default") {
                    parsed.default = true;
                    if meta.input.peek(syn::Token![=]) {
                        let _: LitStr = meta.value()?.parse()?;
                    }
                } else if meta.input.peek(syn::Token![=]) {
                    // other serde options don't affect the column
                    let _: syn::Expr = meta.value()?.parse()?;
                } else if meta.input.peek(syn::token::Paren) {
                    let _nested;
                    syn::parenthesized!(_nested in meta.input);
                }
                Ok(())
            })?;
        }
        Ok(parsed)
    }
}

fn doc_comment(attrs: &[syn::Attribute]) -> String {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .filter_map(|attr| match &attr.meta {
            syn::Meta::NameValue(meta) => match &meta.value {
                syn::Expr::Lit(syn::ExprLit {
                    lit: syn::Lit::Str(doc),
                    ..
                }) => Some(doc.value().trim().to_string()),
                _ => None,
            },
            _ => None,
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_option(ty: &Type) -> bool {
    match ty {
        Type::Path(path) => path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "Option"),
        _ => false,
    }
}
