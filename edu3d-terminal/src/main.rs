/// edu3d Terminal Viewer
///
/// Renders one of the educational models in the terminal.
/// Controls:
///   - Mouse drag / WASD / Arrow Keys: Orbit the camera
///   - Mouse wheel / +/-: Zoom
///   - 1/2/3: Tetrahedra, prism, diamond lattice
///   - R: Reset view
///   - Q/ESC: Quit
use clap::{Parser, ValueEnum};
use edu3d_core::{BondSearch, ModelConfig, ModelKind};
use edu3d_terminal::TerminalApp;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Model {
    Tetrahedra,
    Prism,
    Diamond,
}

impl From<Model> for ModelKind {
    fn from(model: Model) -> Self {
        match model {
            Model::Tetrahedra => ModelKind::Tetrahedra,
            Model::Prism => ModelKind::Prism,
            Model::Diamond => ModelKind::Diamond,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "edu3d-terminal")]
#[command(about = "View educational 3D geometry models in the terminal")]
#[command(version)]
struct Args {
    /// Model shown at startup
    #[arg(short, long, value_enum, default_value = "tetrahedra")]
    model: Model,

    /// Scale of the central tetrahedron
    #[arg(long, default_value_t = 2.0)]
    scale: f64,

    /// Prism dimensions in cells
    #[arg(long, num_args = 3, value_names = ["W", "H", "D"], default_values_t = [2, 5, 11])]
    dims: Vec<u32>,

    /// Edge length of each prism cube
    #[arg(long, default_value_t = 1.0)]
    cube_size: f64,

    /// Gap between prism cubes
    #[arg(long, default_value_t = 0.2)]
    spacing: f64,

    /// Diamond lattice size in unit cells
    #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], default_values_t = [2, 2, 2])]
    cells: Vec<u32>,

    /// Diamond lattice constant
    #[arg(long, default_value_t = edu3d_core::diamond::CARBON_LATTICE_CONSTANT)]
    lattice_constant: f64,

    /// Bond cutoff distance
    #[arg(long, default_value_t = edu3d_core::diamond::DEFAULT_BOND_THRESHOLD)]
    bond_threshold: f64,

    /// Use the grid-bucketed neighbor search for bonds
    #[arg(long)]
    grid_bonds: bool,
}

impl Args {
    fn model_config(&self) -> ModelConfig {
        let mut config = ModelConfig::default();
        config.tetrahedra.scale = self.scale;
        if let [width, height, depth] = self.dims[..] {
            config.prism.width = width;
            config.prism.height = height;
            config.prism.depth = depth;
        }
        config.prism.cube_size = self.cube_size;
        config.prism.spacing = self.spacing;
        if let [x, y, z] = self.cells[..] {
            config.diamond.cells = [x, y, z];
        }
        config.diamond.lattice_constant = self.lattice_constant;
        config.diamond.bond_threshold = self.bond_threshold;
        if self.grid_bonds {
            config.diamond.bond_search = BondSearch::Grid;
        }
        config
    }
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let mut app = match TerminalApp::new(args.model_config(), args.model.into()) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = app.run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
