//! Code generation for the `Model` derive

use proc_macro2::TokenStream;
use quote::quote;
use syn::Ident;
use type_mapping::StoredType;

use crate::parsing::{DefaultSpec, FieldInfo, TableInfo};

fn stored_type_tokens(stored_type: StoredType) -> TokenStream {
    let variant = match stored_type {
        StoredType::String => quote!(String),
        StoredType::Boolean => quote!(Boolean),
        StoredType::Integer => quote!(Integer),
        StoredType::Float => quote!(Float),
        StoredType::Text => quote!(Text),
    };
    quote!(::minorm::store_object::StoredType::#variant)
}

fn descriptor_tokens(field: &FieldInfo) -> TokenStream {
    let stored_type = stored_type_tokens(field.stored_type);
    let name = field.column.as_ref().map(|column| quote!(.name(#column)));
    let ddl = field.ddl.as_ref().map(|ddl| quote!(.ddl(#ddl)));
    let primary_key = field.primary_key.then(|| quote!(.primary_key()));
    let default = match &field.default {
        DefaultSpec::Implicit => None,
        DefaultSpec::None => Some(quote!(.no_default())),
        DefaultSpec::Value(expr) => Some(quote!(.default(#expr))),
        DefaultSpec::Provider(path) => Some(quote!(.default_with(#path))),
    };

    quote! {
        ::minorm::store_object::FieldDescriptor::new(#stored_type)
            #name #ddl #primary_key #default
    }
}

pub fn generate_model_impl(name: &Ident, table: &TableInfo, fields: &[FieldInfo]) -> TokenStream {
    let type_name = name.to_string();
    let table_name = match &table.name {
        Some(table_name) => quote!(Some(#table_name)),
        None => quote!(None),
    };
    let declarations = fields.iter().map(|field| {
        let identifier = field.identifier();
        let descriptor = descriptor_tokens(field);
        quote!((#identifier, #descriptor))
    });

    quote! {
        impl ::minorm::store_object::Model for #name {
            const TYPE_NAME: &'static str = #type_name;

            fn table_name() -> Option<&'static str> {
                #table_name
            }

            fn fields() -> Vec<(&'static str, ::minorm::store_object::FieldDescriptor)> {
                vec![#(#declarations),*]
            }
        }
    }
}
