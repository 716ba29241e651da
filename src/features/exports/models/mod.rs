mod report_block;

pub use report_block::{
    build_blocks, DetailsSection, LabourRow, MaterialRow, PlantRow, ProgressSection, ReportBlock,
};
