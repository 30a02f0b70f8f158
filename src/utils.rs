/// Build a cross-entropy [`Network`](crate::models::Network) with default
/// hyperparameters from `size => Activation` pairs, input layer first.
///
/// ```no_run
/// use sgdnet::network;
///
/// let net = network![784 => Sigmoid, 30 => Sigmoid, 10 => Sigmoid].unwrap();
/// assert_eq!(net.sizes(), &[784, 30, 10]);
/// ```
#[macro_export]
macro_rules! network {
    ($($size:expr => $act:ident),+ $(,)?) => {
        {
            let layers: $crate::error::Result<Vec<$crate::core::Layer>> = vec![
                $($crate::core::Layer::new($size, $crate::core::Activation::$act)),+
            ]
            .into_iter()
            .collect();
            layers.and_then(|layers| {
                $crate::models::Network::new(
                    &layers,
                    $crate::core::Cost::CrossEntropy,
                    $crate::core::HyperParameters::default(),
                )
            })
        }
    };
}
