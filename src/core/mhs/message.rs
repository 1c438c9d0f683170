//! PDS retrieval query message (`QUPA_IN000008UK02`)
//!
//! Renders the HL7v3 payload carried inside the outbound envelope. The
//! message asks PDS for all data held on one patient and is sent with
//! `wait-for-response: false`, so MHS only acknowledges receipt.

use super::types::PDS_RETRIEVAL_INTERACTION_ID;

/// OID root for spine ASIDs
const ASID_OID_ROOT: &str = "1.2.826.0.1285.0.2.0.107";
/// OID root for NHS numbers
const NHS_NUMBER_OID_ROOT: &str = "2.16.840.1.113883.2.1.4.1";
/// OID root for HL7 interaction ids
const INTERACTION_OID_ROOT: &str = "2.16.840.1.113883.2.1.3.2.4.12";

/// Parameters of one PDS retrieval query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdsRetrievalMessage {
    pub conversation_id: String,
    /// `yyyymmddHHMMss`
    pub timestamp: String,
    pub receiving_asid: String,
    pub sending_asid: String,
    pub nhs_number: String,
}

impl PdsRetrievalMessage {
    pub fn new(
        conversation_id: impl Into<String>,
        timestamp: impl Into<String>,
        receiving_asid: impl Into<String>,
        sending_asid: impl Into<String>,
        nhs_number: impl Into<String>,
    ) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            timestamp: timestamp.into(),
            receiving_asid: receiving_asid.into(),
            sending_asid: sending_asid.into(),
            nhs_number: nhs_number.into(),
        }
    }

    /// Render the XML payload
    pub fn render(&self) -> String {
        format!(
            r#"<QUPA_IN000008UK02 xmlns="urn:hl7-org:v3" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
  <id root="{conversation_id}"/>
  <creationTime value="{timestamp}"/>
  <versionCode code="V3NPfIT3.0"/>
  <interactionId root="{interaction_root}" extension="{interaction_id}"/>
  <processingCode code="P"/>
  <processingModeCode code="T"/>
  <acceptAckCode code="NE"/>
  <communicationFunctionRcv typeCode="RCV">
    <device classCode="DEV" determinerCode="INSTANCE">
      <id root="{asid_root}" extension="{receiving_asid}"/>
    </device>
  </communicationFunctionRcv>
  <communicationFunctionSnd typeCode="SND">
    <device classCode="DEV" determinerCode="INSTANCE">
      <id root="{asid_root}" extension="{sending_asid}"/>
    </device>
  </communicationFunctionSnd>
  <ControlActEvent classCode="CACT" moodCode="EVN">
    <author1 typeCode="AUT">
      <AgentSystemSDS classCode="AGNT">
        <agentSystemSDS classCode="DEV" determinerCode="INSTANCE">
          <id root="{asid_root}" extension="{sending_asid}"/>
        </agentSystemSDS>
      </AgentSystemSDS>
    </author1>
    <query>
      <historicDataIndicator>
        <value code="0"/>
        <semanticsText>historicDataIndicator</semanticsText>
      </historicDataIndicator>
      <person.id>
        <value root="{nhs_number_root}" extension="{nhs_number}"/>
        <semanticsText>person.id</semanticsText>
      </person.id>
      <retrievalItem>
        <semanticsText>person.allData</semanticsText>
      </retrievalItem>
    </query>
  </ControlActEvent>
</QUPA_IN000008UK02>"#,
            conversation_id = self.conversation_id,
            timestamp = self.timestamp,
            interaction_root = INTERACTION_OID_ROOT,
            interaction_id = PDS_RETRIEVAL_INTERACTION_ID,
            asid_root = ASID_OID_ROOT,
            receiving_asid = self.receiving_asid,
            sending_asid = self.sending_asid,
            nhs_number_root = NHS_NUMBER_OID_ROOT,
            nhs_number = self.nhs_number,
        )
    }
}
