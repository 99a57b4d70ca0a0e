/// Duplicate an [item](https://doc.rust-lang.org/nightly/reference/items.html) `$imp` for each type
/// `$Int`, making it available within `$imp` under the alias `$IntAlias`.
///
/// Please use traits instead of this, where reasonable.
#[macro_export]
macro_rules! item_with {
    {$IntAlias:ident: $($Int:ty),+ => $imp:item} => {
        $(
            const _: () = { // anonymous module
                type $IntAlias = $Int;
                $imp
            };
        )+
    };
}
