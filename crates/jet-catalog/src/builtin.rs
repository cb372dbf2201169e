//! Built-in synonym catalog.
//!
//! Covers the naming conventions observed across SAP, Oracle, Navision and
//! generic Spanish-language exports. Deployments extend it with JSON files
//! via [`crate::store`].

use jet_model::{DataKind, FieldCatalog, FieldCode, FieldDef};

const GENERIC_ES: &str = "Generic_ES";
const SAP: &str = "SAP";
const ORACLE: &str = "Oracle";
const NAVISION: &str = "Navision";

/// Builds the default catalog of all 18 canonical fields.
pub fn builtin_catalog() -> FieldCatalog {
    let mut catalog = FieldCatalog::new();

    let mut def = FieldDef::new(
        FieldCode::JournalEntryId,
        "ID del Asiento Contable",
        DataKind::Numeric,
    );
    def.add_synonym(GENERIC_ES, "Asiento", 0.9);
    def.add_synonym(GENERIC_ES, "NumAsiento", 0.95);
    def.add_synonym(GENERIC_ES, "ID_Asiento", 0.9);
    def.add_synonym(SAP, "BELNR", 0.95);
    def.add_synonym(ORACLE, "je_header_id", 0.9);
    def.add_synonym(NAVISION, "document_no", 0.8);
    catalog.insert(def);

    let mut def = FieldDef::new(
        FieldCode::LineNumber,
        "Número de Línea del Asiento",
        DataKind::Numeric,
    );
    def.add_synonym(GENERIC_ES, "Linea", 0.9);
    def.add_synonym(GENERIC_ES, "NumLinea", 0.95);
    def.add_synonym(GENERIC_ES, "LineaAsiento", 0.9);
    def.add_synonym(SAP, "BUZEI", 0.95);
    def.add_synonym(ORACLE, "je_line_num", 0.9);
    catalog.insert(def);

    let mut def = FieldDef::new(
        FieldCode::Description,
        "Descripción del Encabezado",
        DataKind::Text,
    );
    def.add_synonym(GENERIC_ES, "Concepto", 0.9);
    def.add_synonym(GENERIC_ES, "ConceptoAsiento", 0.95);
    def.add_synonym(GENERIC_ES, "DescripcionCabecera", 0.9);
    def.add_synonym(SAP, "BKTXT", 0.9);
    def.add_synonym(ORACLE, "description", 0.8);
    catalog.insert(def);

    let mut def = FieldDef::new(
        FieldCode::LineDescription,
        "Descripción de la Línea",
        DataKind::Text,
    );
    def.add_synonym(GENERIC_ES, "DescripcionLinea", 0.9);
    def.add_synonym(GENERIC_ES, "DetalleLinea", 0.8);
    def.add_synonym(SAP, "SGTXT", 0.9);
    def.add_synonym(ORACLE, "line_description", 0.8);
    catalog.insert(def);

    let mut def = FieldDef::new(
        FieldCode::PostingDate,
        "Fecha de Contabilización",
        DataKind::Date,
    );
    def.add_synonym(GENERIC_ES, "Fecha", 0.9);
    def.add_synonym(GENERIC_ES, "FechaAsiento", 0.95);
    def.add_synonym(GENERIC_ES, "FechaContabilizacion", 0.9);
    def.add_synonym(SAP, "BUDAT", 0.95);
    def.add_synonym(ORACLE, "effective_date", 0.9);
    def.add_synonym(NAVISION, "posting_date", 0.9);
    catalog.insert(def);

    let mut def = FieldDef::new(FieldCode::FiscalYear, "Año Fiscal", DataKind::Numeric);
    def.add_synonym(GENERIC_ES, "Año", 0.8);
    def.add_synonym(GENERIC_ES, "AñoFiscal", 0.95);
    def.add_synonym(GENERIC_ES, "Ejercicio", 0.9);
    def.add_synonym(SAP, "GJAHR", 0.95);
    def.add_synonym(ORACLE, "period_year", 0.8);
    catalog.insert(def);

    let mut def = FieldDef::new(
        FieldCode::PeriodNumber,
        "Número de Período",
        DataKind::Numeric,
    );
    def.add_synonym(GENERIC_ES, "Periodo", 0.9);
    def.add_synonym(GENERIC_ES, "Mes", 0.8);
    def.add_synonym(GENERIC_ES, "PeriodoContable", 0.95);
    def.add_synonym(SAP, "MONAT", 0.95);
    def.add_synonym(ORACLE, "period_num", 0.9);
    catalog.insert(def);

    let mut def = FieldDef::new(
        FieldCode::GlAccountNumber,
        "Número de Cuenta Contable",
        DataKind::Alphanumeric,
    );
    def.add_synonym(GENERIC_ES, "Cuenta", 0.9);
    def.add_synonym(GENERIC_ES, "CuentaContable", 0.95);
    def.add_synonym(GENERIC_ES, "CodigoCuenta", 0.9);
    def.add_synonym(SAP, "HKONT", 0.95);
    def.add_synonym(ORACLE, "account", 0.8);
    def.add_synonym(NAVISION, "g_l_account_no", 0.9);
    catalog.insert(def);

    let mut def = FieldDef::new(
        FieldCode::GlAccountName,
        "Nombre de la Cuenta Contable",
        DataKind::Text,
    );
    def.add_synonym(GENERIC_ES, "NombreCuenta", 0.95);
    def.add_synonym(GENERIC_ES, "DescripcionCuenta", 0.9);
    def.add_synonym(GENERIC_ES, "DenominacionCuenta", 0.8);
    def.add_synonym(SAP, "TXT50", 0.9);
    def.add_synonym(ORACLE, "account_description", 0.8);
    def.add_synonym(NAVISION, "account_name", 0.8);
    catalog.insert(def);

    let mut def = FieldDef::new(FieldCode::Amount, "Importe", DataKind::Currency);
    def.add_synonym(GENERIC_ES, "Importe", 0.95);
    def.add_synonym(GENERIC_ES, "Saldo", 0.9);
    def.add_synonym(GENERIC_ES, "Total", 0.8);
    def.add_synonym(SAP, "DMBTR", 0.95);
    def.add_synonym(ORACLE, "entered_amount", 0.8);
    catalog.insert(def);

    let mut def = FieldDef::new(FieldCode::DebitAmount, "Importe Debe", DataKind::Currency);
    def.add_synonym(GENERIC_ES, "Debe", 0.95);
    def.add_synonym(GENERIC_ES, "ImporteDebe", 0.9);
    def.add_synonym(GENERIC_ES, "Debito", 0.8);
    def.add_synonym(SAP, "SOLLBETRAG", 0.9);
    def.add_synonym(ORACLE, "entered_dr", 0.9);
    def.add_synonym(NAVISION, "debit_amount", 0.9);
    catalog.insert(def);

    let mut def = FieldDef::new(FieldCode::CreditAmount, "Importe Haber", DataKind::Currency);
    def.add_synonym(GENERIC_ES, "Haber", 0.95);
    def.add_synonym(GENERIC_ES, "ImporteHaber", 0.9);
    def.add_synonym(GENERIC_ES, "Credito", 0.8);
    def.add_synonym(SAP, "HABENBETRAG", 0.9);
    def.add_synonym(ORACLE, "entered_cr", 0.9);
    def.add_synonym(NAVISION, "credit_amount", 0.9);
    catalog.insert(def);

    let mut def = FieldDef::new(
        FieldCode::DebitCreditIndicator,
        "Indicador Debe/Haber",
        DataKind::Text,
    );
    def.add_synonym(GENERIC_ES, "IndicadorDH", 0.9);
    def.add_synonym(GENERIC_ES, "DebeHaber", 0.8);
    def.add_synonym(SAP, "SHKZG", 0.95);
    def.add_synonym(ORACLE, "dc_indicator", 0.8);
    catalog.insert(def);

    let mut def = FieldDef::new(FieldCode::PreparedBy, "Preparado Por", DataKind::Text);
    def.add_synonym(GENERIC_ES, "Usuario", 0.8);
    def.add_synonym(GENERIC_ES, "PreparadoPor", 0.95);
    def.add_synonym(GENERIC_ES, "CreadoPor", 0.9);
    def.add_synonym(SAP, "USNAM", 0.9);
    def.add_synonym(ORACLE, "created_by", 0.8);
    catalog.insert(def);

    let mut def = FieldDef::new(FieldCode::EntryDate, "Fecha de Entrada", DataKind::Date);
    def.add_synonym(GENERIC_ES, "FechaEntrada", 0.95);
    def.add_synonym(GENERIC_ES, "FechaCreacion", 0.9);
    def.add_synonym(GENERIC_ES, "FechaCaptura", 0.8);
    def.add_synonym(SAP, "CPUDT", 0.9);
    def.add_synonym(ORACLE, "creation_date", 0.8);
    catalog.insert(def);

    let mut def = FieldDef::new(FieldCode::EntryTime, "Hora de Entrada", DataKind::Text);
    def.add_synonym(GENERIC_ES, "HoraEntrada", 0.95);
    def.add_synonym(GENERIC_ES, "HoraCreacion", 0.9);
    def.add_synonym(SAP, "CPUTM", 0.9);
    def.add_synonym(ORACLE, "creation_time", 0.8);
    catalog.insert(def);

    let mut def = FieldDef::new(
        FieldCode::VendorId,
        "ID del Proveedor/Tercero",
        DataKind::Alphanumeric,
    );
    def.add_synonym(GENERIC_ES, "Proveedor", 0.9);
    def.add_synonym(GENERIC_ES, "IDProveedor", 0.95);
    def.add_synonym(GENERIC_ES, "CodigoProveedor", 0.9);
    def.add_synonym(GENERIC_ES, "Tercero", 0.8);
    def.add_synonym(SAP, "LIFNR", 0.95);
    def.add_synonym(ORACLE, "vendor_id", 0.9);
    def.add_synonym(NAVISION, "vendor_no", 0.8);
    catalog.insert(def);

    let mut def = FieldDef::new(
        FieldCode::DocumentNumber,
        "Número de Documento",
        DataKind::Alphanumeric,
    );
    def.add_synonym(GENERIC_ES, "NumDoc", 0.9);
    def.add_synonym(GENERIC_ES, "NumDocumento", 0.95);
    def.add_synonym(GENERIC_ES, "Documento", 0.8);
    def.add_synonym(SAP, "XBLNR", 0.95);
    def.add_synonym(ORACLE, "reference", 0.8);
    catalog.insert(def);

    catalog
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_covers_every_canonical_field() {
        let catalog = builtin_catalog();
        assert_eq!(catalog.len(), FieldCode::ALL.len());
        for code in FieldCode::ALL {
            assert!(catalog.get(code).is_some(), "missing {code}");
        }
    }

    #[test]
    fn builtin_has_sap_fingerprint_synonyms() {
        let catalog = builtin_catalog();
        let journal = catalog.get(FieldCode::JournalEntryId).unwrap();
        assert!(journal.synonyms_for_erp("SAP").iter().any(|s| s.name == "BELNR"));
        let account = catalog.get(FieldCode::GlAccountNumber).unwrap();
        assert!(account.synonyms_for_erp("SAP").iter().any(|s| s.name == "HKONT"));
    }
}
