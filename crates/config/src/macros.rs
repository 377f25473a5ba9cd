#[macro_export]
macro_rules! config_struct {
    ($struct:item) => {
        #[derive(Clone, Debug, PartialEq)]
        $struct
    };
}
