mod cache_engine;
mod cache_item;
mod cache_mode;

pub use cache_engine::*;
pub use cache_item::*;
pub use cache_mode::*;

#[macro_export]
macro_rules! cache_item {
    ($item:item) => {
        #[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
        #[serde(default, rename_all = "camelCase")]
        $item
    };
}
