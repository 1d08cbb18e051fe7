//! Tests across the dictionary, the segmenter, and the projections.
