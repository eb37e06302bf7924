use crate::utils::{snake_to_camel_case, FieldInput, TypeHelper};

/// Suffix the JSON declaration uses for optional keys.
pub const OPTIONAL_SUFFIX: &str = "_opt";

/// A named struct field as the generated code sees it.
#[derive(Debug)]
pub struct Field<'a> {
    pub ident: &'a syn::Ident,
    /// Key in the value object, without any optional suffix.
    pub key: String,
    pub optional: bool,
    /// The field type, or `T` for an `Option<T>` field.
    pub value_type: TypeHelper<'a>,
}

impl<'a> Field<'a> {
    pub fn from_input(input: &'a FieldInput) -> Result<Self, String> {
        let ident = input
            .ident
            .as_ref()
            .ok_or_else(|| "Tuple struct fields are not supported".to_string())?;

        let key = match &input.rename {
            Some(rename) => rename.clone(),
            None => snake_to_camel_case(&ident.to_string()),
        };

        let ty = TypeHelper::new(&input.ty);
        let (optional, value_type) = match ty.option_inner() {
            Some(inner) => (true, inner),
            None => (false, ty),
        };

        Ok(Field {
            ident,
            key,
            optional,
            value_type,
        })
    }

    /// Key the JSON declaration must use for this field.
    pub fn declared_key(&self) -> String {
        if self.optional {
            format!("{}{}", self.key, OPTIONAL_SUFFIX)
        } else {
            self.key.clone()
        }
    }
}

pub fn collect_fields(inputs: &[FieldInput]) -> Result<Vec<Field<'_>>, String> {
    inputs.iter().map(Field::from_input).collect()
}
