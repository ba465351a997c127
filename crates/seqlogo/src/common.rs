use usvg::Tree;

pub fn prepare_svg_tree(svg_data: &[u8]) -> Result<Tree, String> {
    let options = usvg::Options::default();
    usvg::Tree::from_data(svg_data, &options).map_err(|e| e.to_string())
}
