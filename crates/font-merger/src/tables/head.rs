use font_types::Fixed;
use read_fonts::TableProvider;
use write_fonts::tables::{
    head::{Flags, Head, MacStyle},
    loca::LocaFormat,
};

use crate::{
    Result,
    context::MergeContext,
    strategies::{Bit, equal, first, max, merge_bits, min},
};

use Bit::{All, Any, First};

const HEAD_FLAGS: [Bit; 16] = [
    Any, Any, First, Any, Any, // baseline, lsb, ppem-dependent, integer ppem, advance
    First, First, First, First, First, First, // reserved
    Any, Any, Any, Any, // lossless, converted, cleartype, last resort
    First,
];

const MAC_STYLE: [Bit; 16] = [
    All, All, // bold, italic
    Any, Any, Any, // underline, outline, shadow
    All, All, // condensed, extended
    First, First, First, First, First, First, First, First, First,
];

pub fn merge_head(ctx: &MergeContext, loca_format: LocaFormat) -> Result<Head> {
    let tables = ctx.tables(|f| f.head())?;
    let flags: Vec<u16> = tables.iter().map(|t| t.flags().bits()).collect();
    let mac_styles: Vec<u16> = tables.iter().map(|t| t.mac_style().bits()).collect();
    let primary = first(&tables)?;

    Ok(Head {
        font_revision: Fixed::from_bits(max(tables.iter().map(|t| t.font_revision().to_bits()))?),
        checksum_adjustment: 0,
        magic_number: 0x5F0F3CF5,
        flags: Flags::from_bits_truncate(merge_bits(&flags, &HEAD_FLAGS)?),
        units_per_em: equal(tables.iter().map(|t| t.units_per_em()), "head", "unitsPerEm")?,
        created: primary.created(),
        modified: primary.modified(),
        x_min: min(tables.iter().map(|t| t.x_min()))?,
        y_min: min(tables.iter().map(|t| t.y_min()))?,
        x_max: max(tables.iter().map(|t| t.x_max()))?,
        y_max: max(tables.iter().map(|t| t.y_max()))?,
        mac_style: MacStyle::from_bits_truncate(merge_bits(&mac_styles, &MAC_STYLE)?),
        lowest_rec_ppem: max(tables.iter().map(|t| t.lowest_rec_ppem()))?,
        font_direction_hint: primary.font_direction_hint(),
        index_to_loc_format: match loca_format {
            LocaFormat::Short => 0,
            LocaFormat::Long => 1,
        },
    })
}
