//! Operations applied through the layered image model.

use strata_core::{
    Channel, FocusableLayeredImage, Image, ImageOperation, LayeredImage, Pixel, PixelCoord, Raster,
};
use strata_ops::{
    filters, Composite, ContentOperation, EdgeMode, FilterKind, Kernel, KernelFilter,
    MosaicFilter,
};

fn checker(width: u32, height: u32) -> Image {
    Image::from_fn(width, height, |c| {
        if (c.row + c.col) % 2 == 0 {
            Pixel::new(250, 10, 130)
        } else {
            Pixel::new(5, 240, 60)
        }
    })
    .unwrap()
}

#[test]
fn identity_kernel_on_every_channel() {
    let img = checker(9, 6);
    let identity: Composite = Channel::ALL
        .into_iter()
        .map(|ch| KernelFilter::new(Kernel::identity(), ch, EdgeMode::Exclude).into())
        .collect();
    assert_eq!(identity.operate_on(&img), img);
}

#[test]
fn every_catalog_filter_keeps_size_and_range() {
    let img = checker(12, 7);
    for kind in FilterKind::ALL {
        let op = kind.build(Some(6), filters::DEFAULT_MOSAIC_SEED).unwrap();
        let out = op.operate_on(&img);
        assert_eq!(out.dimensions(), img.dimensions(), "{kind}");
        assert!(out.pixels().iter().all(Pixel::is_displayable), "{kind}");
    }
}

#[test]
fn filters_do_not_touch_input() {
    let img = checker(6, 6);
    let snapshot = img.mutable_copy().immutable_copy();
    for kind in FilterKind::ALL {
        let _ = kind.build(Some(3), 1).unwrap().operate_on(&img);
    }
    assert_eq!(img, snapshot);
}

#[test]
fn deterministic_mosaic() {
    let img = checker(10, 10);
    let a = MosaicFilter::new(7, filters::DEFAULT_MOSAIC_SEED).unwrap();
    let b = MosaicFilter::new(7, filters::DEFAULT_MOSAIC_SEED).unwrap();
    assert_eq!(a.operate_on(&img), b.operate_on(&img));
}

#[test]
fn apply_to_focus_layer_only() {
    let mut project = FocusableLayeredImage::default();
    project.create_layer("bottom", 0, checker(8, 8)).unwrap();
    project.create_layer("top", 0, checker(8, 8)).unwrap();
    project.set_focus_layer("top").unwrap();

    project.apply_to_focus(&filters::grayscale()).unwrap();

    let top = project.layer("top").unwrap().image();
    assert!(top.pixels().iter().all(|p| p.r == p.g && p.g == p.b));
    assert_eq!(project.layer("bottom").unwrap().image(), &checker(8, 8));
}

#[test]
fn blur_flattens_checker_interior() {
    let mut project = LayeredImage::new();
    project.create_layer("only", 0, checker(16, 9)).unwrap();
    project.apply(&filters::blur(), "only").unwrap();

    // Own color and diagonals weigh 1/2, edge neighbours the other 1/2.
    let out = project.layer(0).unwrap().image();
    for (row, col) in [(4, 8), (4, 9), (1, 1), (7, 14)] {
        assert_eq!(
            out.pixel_at(PixelCoord::new(row, col)),
            Some(Pixel::new(128, 125, 95))
        );
    }
}

#[test]
fn sole_layer_pipeline() {
    let mut project = LayeredImage::new();
    project.create_layer("only", 0, checker(16, 9)).unwrap();
    let pipeline = Composite::new(vec![filters::blur(), filters::sharpen()]);
    project
        .apply(&ContentOperation::from(pipeline), "only")
        .unwrap();
    assert_eq!(project.dimensions(), Some((16, 9)));
    assert_eq!(project.layer_names(), vec!["only"]);
}
