use proc_macro::TokenStream;
use proc_macro2::TokenStream as Tokens;
use quote::quote;
use syn::{
    meta,
    parse::{Error as ParseError, Parser},
    parse_macro_input, Ident, ItemFn, LitStr, ReturnType,
};

#[derive(Default, Debug)]
struct TestAttributes {
    pub serial: Option<LitStr>,
    pub skip: Option<LitStr>,
}

impl TestAttributes {
    fn parse(input: TokenStream) -> Result<Self, ParseError> {
        let mut attrs = Self::default();

        let parser = meta::parser(|meta| {
            if meta.path.is_ident("serial") {
                attrs.serial = Some(meta.value()?.parse()?);
                Ok(())
            } else if meta.path.is_ident("skip") {
                attrs.skip = Some(meta.value()?.parse()?);
                Ok(())
            } else {
                Err(meta.error("unsupported test property"))
            }
        });

        parser.parse(input)?;
        Ok(attrs)
    }
}

/// Test attribute running the shared test setup before the body. Supported properties
/// - serial - the test never runs in parallel with other tests of the same key (the calling crate
///   must depend on `serial_test`).
/// - skip - skip the test with the given reason
#[proc_macro_attribute]
pub fn test(attr: TokenStream, item: TokenStream) -> TokenStream {
    let attrs = match TestAttributes::parse(attr) {
        Ok(attrs) => attrs,
        Err(err) => return err.to_compile_error().into(),
    };
    let input = parse_macro_input!(item as ItemFn);

    if let Some(asyncness) = &input.sig.asyncness {
        return ParseError::new_spanned(asyncness, "async tests are not supported")
            .to_compile_error()
            .into();
    }

    let mut test_decors = vec![quote! { #[::core::prelude::v1::test] }];
    if let Some(serial) = attrs.serial {
        let key = Ident::new(&serial.value(), serial.span());
        test_decors.push(quote! { #[::serial_test::serial(#key)] });
    }
    if let Some(skip) = attrs.skip {
        test_decors.push(quote! { #[ignore = #skip] });
    }

    expand_wrapper(&test_decors, &input)
}

/// Emit code for a wrapper function around a test function.
fn expand_wrapper(test_decors: &[Tokens], input: &ItemFn) -> TokenStream {
    let body = &input.block;
    let test_name = &input.sig.ident;

    let ret = match &input.sig.output {
        ReturnType::Default => quote! {},
        ReturnType::Type(_, ty) => quote! {-> #ty},
    };

    let result = quote! {
      #(#test_decors)*
      fn #test_name() #ret {
        fn test_impl() #ret {
          #body
        }

        ::shine_test::setup_test();

        test_impl()
      }
    };
    result.into()
}
