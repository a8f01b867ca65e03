pub mod mask_classifier;
